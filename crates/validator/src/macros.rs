//! Macros for declaring rules with minimal boilerplate.
//!
//! # Examples
//!
//! ```rust,ignore
//! use apivalid::{rule, ValidationError};
//!
//! // Unit rule (no fields)
//! rule! {
//!     /// Rejects the literal string "null".
//!     pub NotNullLiteral;
//!     validate(value) {
//!         match value.value().as_str() {
//!             Some("null") => Err(ValidationError::new("null_literal", "must not be \"null\"").into()),
//!             _ => Ok(()),
//!         }
//!     }
//!     describe(name, acc) { Ok(()) }
//!     fn not_null_literal();
//! }
//!
//! // Rule with fields
//! rule! {
//!     pub Note { text: String };
//!     validate(self, value) { Ok(()) }
//!     describe(self, name, acc) {
//!         acc.append_description(&self.text);
//!         Ok(())
//!     }
//!     fn note(text: impl Into<String>) { Note { text: text.into() } }
//! }
//! ```

/// Declares a rule: the struct, its [`Rule`](crate::Rule) implementation and
/// a factory function.
///
/// `#[derive(Debug, Clone)]` is always applied to rules with fields; unit
/// rules additionally derive `Copy, PartialEq, Eq, Hash`.
#[macro_export]
macro_rules! rule {
    // ── Unit rule + const factory ────────────────────────────────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident;
        validate($value:ident) $validate:block
        describe($dname:ident, $acc:ident) $describe:block
        fn $factory:ident();
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis struct $name;

        impl $crate::Rule for $name {
            #[allow(unused_variables)]
            fn validate(
                &self,
                $value: &dyn $crate::Inspect,
            ) -> ::core::result::Result<(), $crate::FieldError> $validate

            #[allow(unused_variables)]
            fn describe(
                &self,
                $dname: &str,
                $acc: &mut $crate::schema::SchemaAccumulator<'_>,
            ) -> ::core::result::Result<(), $crate::SchemaError> $describe
        }

        #[must_use]
        $vis const fn $factory() -> $name {
            $name
        }
    };

    // ── Rule with fields + factory with constructor body ─────────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident { $($field:ident: $fty:ty),+ $(,)? };
        validate($self_:ident, $value:ident) $validate:block
        describe($self2:ident, $dname:ident, $acc:ident) $describe:block
        fn $factory:ident($($farg:ident: $faty:ty),* $(,)?) $new_body:block
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            $($field: $fty,)+
        }

        impl $crate::Rule for $name {
            #[allow(unused_variables)]
            fn validate(
                &$self_,
                $value: &dyn $crate::Inspect,
            ) -> ::core::result::Result<(), $crate::FieldError> $validate

            #[allow(unused_variables)]
            fn describe(
                &$self2,
                $dname: &str,
                $acc: &mut $crate::schema::SchemaAccumulator<'_>,
            ) -> ::core::result::Result<(), $crate::SchemaError> $describe
        }

        #[must_use]
        $vis fn $factory($($farg: $faty),*) -> $name $new_body
    };
}
