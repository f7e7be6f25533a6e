//! Presence rules.
//!
//! These are the only rules that look at empty values; every other rule in
//! the library accepts them.

use crate::error::ValidationError;

crate::rule! {
    /// Rejects empty values: null, `false`, zero, `""` and empty collections.
    ///
    /// Marks the field as required on the enclosing object schema.
    pub Required;
    validate(value) {
        if value.value().is_empty() {
            return Err(ValidationError::new("required", "cannot be blank").into());
        }
        Ok(())
    }
    describe(name, acc) {
        if !name.is_empty() {
            acc.require(name);
        }
        Ok(())
    }
    fn required();
}

crate::rule! {
    /// Rejects null only; zero values pass.
    pub NotNil;
    validate(value) {
        if value.value().is_nil() {
            return Err(ValidationError::new("not_nil", "is required").into());
        }
        Ok(())
    }
    describe(name, acc) {
        acc.property().nullable = false;
        Ok(())
    }
    fn not_nil();
}

crate::rule! {
    /// Accepts null only.
    pub Nil;
    validate(value) {
        if !value.value().is_nil() {
            return Err(ValidationError::new("nil", "must be blank").into());
        }
        Ok(())
    }
    describe(name, acc) {
        acc.append_description("null");
        Ok(())
    }
    fn nil();
}

crate::rule! {
    /// Accepts empty values only.
    pub Empty;
    validate(value) {
        if !value.value().is_empty() {
            return Err(ValidationError::new("empty", "must be blank").into());
        }
        Ok(())
    }
    describe(name, acc) {
        acc.append_description("empty");
        Ok(())
    }
    fn empty();
}
