//! The rule contract.

use std::fmt;
use std::sync::Arc;

use crate::error::{FieldError, SchemaError};
use crate::inspect::Inspect;
use crate::schema::SchemaAccumulator;

/// One unit of validation logic plus its documentation.
///
/// `validate` receives the field value. [`Inspect::value`] reads it with
/// `Option`/`Box` indirection removed; typed rules reach the concrete type
/// through [`downcast_target`](trait.Inspect.html#method.downcast_target).
/// Unless a rule exists to reject emptiness, it accepts empty values.
///
/// `describe` decorates the property schema of the field the rule is bound
/// to. It never sees live data and must be idempotent.
pub trait Rule: Send + Sync + fmt::Debug {
    fn validate(&self, value: &dyn Inspect) -> Result<(), FieldError>;

    /// Validates a struct field, with `parent` the struct holding it. Rules
    /// whose outcome depends on sibling fields override this.
    fn validate_in(&self, value: &dyn Inspect, parent: &dyn Inspect) -> Result<(), FieldError> {
        let _ = parent;
        self.validate(value)
    }

    fn describe(&self, name: &str, acc: &mut SchemaAccumulator<'_>) -> Result<(), SchemaError>;

    /// When true, the remaining rules of the binding (and the implicit
    /// recursion into the field) are not run.
    fn halts(&self) -> bool {
        false
    }
}

impl<R: Rule + ?Sized> Rule for Arc<R> {
    fn validate(&self, value: &dyn Inspect) -> Result<(), FieldError> {
        (**self).validate(value)
    }

    fn validate_in(&self, value: &dyn Inspect, parent: &dyn Inspect) -> Result<(), FieldError> {
        (**self).validate_in(value, parent)
    }

    fn describe(&self, name: &str, acc: &mut SchemaAccumulator<'_>) -> Result<(), SchemaError> {
        (**self).describe(name, acc)
    }

    fn halts(&self) -> bool {
        (**self).halts()
    }
}

impl<R: Rule + ?Sized> Rule for Box<R> {
    fn validate(&self, value: &dyn Inspect) -> Result<(), FieldError> {
        (**self).validate(value)
    }

    fn validate_in(&self, value: &dyn Inspect, parent: &dyn Inspect) -> Result<(), FieldError> {
        (**self).validate_in(value, parent)
    }

    fn describe(&self, name: &str, acc: &mut SchemaAccumulator<'_>) -> Result<(), SchemaError> {
        (**self).describe(name, acc)
    }

    fn halts(&self) -> bool {
        (**self).halts()
    }
}

/// Runs `rules` in order against `value`, stopping at the first failure or
/// at a halting rule.
pub(crate) fn apply(rules: &[Arc<dyn Rule>], value: &dyn Inspect) -> Result<(), FieldError> {
    for rule in rules {
        if rule.halts() {
            return Ok(());
        }
        rule.validate(value)?;
    }
    Ok(())
}

/// [`apply`] for a struct field held by `parent`.
pub(crate) fn apply_in(
    rules: &[Arc<dyn Rule>],
    value: &dyn Inspect,
    parent: &dyn Inspect,
) -> Result<(), FieldError> {
    for rule in rules {
        if rule.halts() {
            return Ok(());
        }
        rule.validate_in(value, parent)?;
    }
    Ok(())
}

/// Builds a `Vec<Arc<dyn Rule>>` from rule expressions.
///
/// ```rust
/// use apivalid::prelude::*;
///
/// let rules = rules![required(), length(1, 10)];
/// assert_eq!(rules.len(), 2);
/// ```
#[macro_export]
macro_rules! rules {
    () => {
        ::std::vec::Vec::<::std::sync::Arc<dyn $crate::Rule>>::new()
    };
    ($($rule:expr),+ $(,)?) => {
        ::std::vec![$(::std::sync::Arc::new($rule) as ::std::sync::Arc<dyn $crate::Rule>),+]
    };
}
