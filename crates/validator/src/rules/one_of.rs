//! Enumerated values and allowed map keys.

use crate::error::{FieldError, SchemaError, ValidationError};
use crate::inspect::Inspect;
use crate::rule::Rule;
use crate::schema::SchemaAccumulator;
use crate::value::Value;

/// Renders a literal the way messages quote it: strings without JSON quotes.
pub(crate) fn render_literal(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// IN
// ============================================================================

/// Accepts only the listed values. Numbers compare by value.
#[derive(Debug, Clone)]
pub struct In {
    values: Vec<serde_json::Value>,
    message: String,
}

/// Accepts only values equal to one of `values`.
///
/// ```rust
/// use apivalid::prelude::*;
///
/// let rule = in_list(["ach", "cc", "wire"]);
/// let err = rule.validate(&String::from("bitcoin")).unwrap_err();
/// assert_eq!(err.to_string(), "must be one of 'ach', 'cc', 'wire' got 'bitcoin'");
/// ```
#[must_use]
pub fn in_list<I, V>(values: I) -> In
where
    I: IntoIterator<Item = V>,
    V: Into<serde_json::Value>,
{
    let values: Vec<serde_json::Value> = values.into_iter().map(Into::into).collect();
    let allowed: Vec<String> = values
        .iter()
        .map(|v| format!("'{}'", render_literal(v)))
        .collect();
    In {
        message: format!("must be one of {}", allowed.join(", ")),
        values,
    }
}

impl In {
    /// The allowed values, in declaration order.
    #[must_use]
    pub fn values(&self) -> &[serde_json::Value] {
        &self.values
    }
}

impl Rule for In {
    fn validate(&self, value: &dyn Inspect) -> Result<(), FieldError> {
        let value = value.value();
        if value.is_empty() || self.values.iter().any(|allowed| value.matches(allowed)) {
            return Ok(());
        }
        Err(ValidationError::new("in_invalid", format!("{} got '{value}'", self.message)).into())
    }

    fn describe(&self, _name: &str, acc: &mut SchemaAccumulator<'_>) -> Result<(), SchemaError> {
        acc.property().enum_values = self.values.clone();
        Ok(())
    }
}

// ============================================================================
// KEY IN
// ============================================================================

crate::rule! {
    /// Accepts maps whose keys are all listed.
    pub KeyIn { keys: Vec<String> };
    validate(self, value) {
        match value.value() {
            Value::Null => Ok(()),
            Value::Map(entries) => {
                for (key, _) in &entries {
                    if !self.keys.iter().any(|k| k == key) {
                        return Err(ValidationError::new(
                            "key_not_allowed",
                            format!("key '{key}' not allowed"),
                        )
                        .with_param("key", key.clone())
                        .into());
                    }
                }
                Ok(())
            }
            other => Err(ValidationError::new(
                "type",
                format!("must be a map, got {}", other.kind()),
            )
            .into()),
        }
    }
    describe(self, name, acc) {
        acc.append_description(&format!("keys must be in ({})", self.keys.join(",")));
        Ok(())
    }
    fn key_in(keys: impl IntoIterator<Item = impl Into<String>>) {
        KeyIn {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}
