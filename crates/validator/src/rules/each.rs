use std::sync::Arc;

use crate::error::{FieldError, SchemaError, ValidationError, ValidationErrors};
use crate::inspect::Inspect;
use crate::rule::{self, Rule};
use crate::schema::SchemaAccumulator;
use crate::value::Value;

/// Applies rules to every element of a sequence or every value of a map.
#[derive(Debug, Clone)]
pub struct Each {
    rules: Vec<Arc<dyn Rule>>,
}

/// Validates each element against `rules`. Failures are keyed by index (or
/// map key) and reported together.
///
/// ```rust
/// use apivalid::prelude::*;
///
/// let rule = each(rules![length(1, 3)]);
/// let err = rule
///     .validate(&vec!["ok".to_owned(), "toolong".to_owned()])
///     .unwrap_err();
/// assert_eq!(err.to_string(), "1: the length must be between 1 and 3.");
/// ```
#[must_use]
pub fn each(rules: Vec<Arc<dyn Rule>>) -> Each {
    Each { rules }
}

impl Each {
    fn check(&self, value: &dyn Inspect, parent: Option<&dyn Inspect>) -> Result<(), FieldError> {
        let entries: Vec<(String, &dyn Inspect)> = match value.value() {
            Value::Null => return Ok(()),
            Value::Seq(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| (i.to_string(), item))
                .collect(),
            Value::Map(entries) => entries,
            other => {
                return Err(ValidationError::new(
                    "type",
                    "must be an iterable (map, slice or array)",
                )
                .with_param("kind", other.kind())
                .into());
            }
        };

        let mut errors = ValidationErrors::new();
        for (key, item) in entries {
            let result = match parent {
                Some(parent) => rule::apply_in(&self.rules, item, parent),
                None => rule::apply(&self.rules, item),
            };
            if let Err(error) = result {
                errors.insert(key, error);
            }
        }
        errors.into_result().map_err(FieldError::Nested)
    }
}

impl Rule for Each {
    fn validate(&self, value: &dyn Inspect) -> Result<(), FieldError> {
        self.check(value, None)
    }

    /// Element rules see the struct holding the collection as their parent.
    fn validate_in(&self, value: &dyn Inspect, parent: &dyn Inspect) -> Result<(), FieldError> {
        self.check(value, Some(parent))
    }

    /// Describes the element rules onto `items` when the property is an
    /// array, otherwise onto the property itself.
    fn describe(&self, name: &str, acc: &mut SchemaAccumulator<'_>) -> Result<(), SchemaError> {
        match acc.property().items.as_deref_mut() {
            Some(items) => {
                let mut scratch = Vec::new();
                let mut inner = SchemaAccumulator::new(&mut scratch, items);
                for rule in &self.rules {
                    rule.describe(name, &mut inner)?;
                }
            }
            None => {
                for rule in &self.rules {
                    rule.describe(name, acc)?;
                }
            }
        }
        Ok(())
    }
}
