//! User-supplied checks.

use std::fmt;
use std::marker::PhantomData;

use regex::Regex;

use crate::error::{FieldError, SchemaError, ValidationError};
use crate::inspect::Inspect;
use crate::rule::Rule;
use crate::schema::SchemaAccumulator;
use crate::value::Value;

type Check = dyn Fn(&dyn Inspect) -> Result<(), ValidationError> + Send + Sync;

// ============================================================================
// CUSTOM
// ============================================================================

/// A check over the raw inspected value. Runs on empty values too.
pub struct Custom {
    check: Box<Check>,
    desc: String,
}

/// Wraps a function over the inspected value. `desc` documents it.
#[must_use]
pub fn custom<F>(check: F, desc: impl Into<String>) -> Custom
where
    F: Fn(&dyn Inspect) -> Result<(), ValidationError> + Send + Sync + 'static,
{
    Custom {
        check: Box::new(check),
        desc: desc.into(),
    }
}

impl fmt::Debug for Custom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Custom").field("desc", &self.desc).finish()
    }
}

impl Rule for Custom {
    fn validate(&self, value: &dyn Inspect) -> Result<(), FieldError> {
        (self.check)(value).map_err(FieldError::Invalid)
    }

    fn describe(&self, _name: &str, acc: &mut SchemaAccumulator<'_>) -> Result<(), SchemaError> {
        acc.append_description(&self.desc);
        Ok(())
    }
}

// ============================================================================
// BY
// ============================================================================

/// A typed check. The field must hold a `T`, possibly behind `Option` and
/// `Box` layers; a `None` passes.
pub struct By<T> {
    check: Box<dyn Fn(&T) -> Result<(), ValidationError> + Send + Sync>,
    desc: String,
    _marker: PhantomData<fn(&T)>,
}

/// Wraps a closure over the concrete field type.
///
/// ```rust
/// use apivalid::prelude::*;
///
/// let even = by(
///     |n: &i64| if n % 2 == 0 { Ok(()) } else { Err(ValidationError::custom("must be even")) },
///     "an even number",
/// );
/// assert!(even.validate(&4_i64).is_ok());
/// assert!(even.validate(&Some(3_i64)).is_err());
/// assert!(even.validate(&None::<i64>).is_ok());
/// ```
#[must_use]
pub fn by<T, F>(check: F, desc: impl Into<String>) -> By<T>
where
    T: Inspect,
    F: Fn(&T) -> Result<(), ValidationError> + Send + Sync + 'static,
{
    By {
        check: Box::new(check),
        desc: desc.into(),
        _marker: PhantomData,
    }
}

impl<T> fmt::Debug for By<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("By")
            .field("type", &std::any::type_name::<T>())
            .field("desc", &self.desc)
            .finish()
    }
}

impl<T: Inspect> Rule for By<T> {
    fn validate(&self, value: &dyn Inspect) -> Result<(), FieldError> {
        match value.downcast_target::<T>()? {
            Some(v) => (self.check)(v).map_err(FieldError::Invalid),
            None => Ok(()),
        }
    }

    fn describe(&self, _name: &str, acc: &mut SchemaAccumulator<'_>) -> Result<(), SchemaError> {
        acc.append_description(&self.desc);
        Ok(())
    }
}

// ============================================================================
// STRING RULES
// ============================================================================

/// A predicate over string values. Empty strings pass.
pub struct StringRule {
    check: Box<dyn Fn(&str) -> bool + Send + Sync>,
    error: ValidationError,
    desc: String,
}

/// Fails with `desc` as the message when `check` returns false.
#[must_use]
pub fn string_rule<F>(check: F, desc: impl Into<String>) -> StringRule
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    let desc = desc.into();
    StringRule {
        check: Box::new(check),
        error: ValidationError::new("string_invalid", desc.clone()),
        desc,
    }
}

/// Like [`string_rule`], failing with `error` instead.
#[must_use]
pub fn string_rule_with_error<F>(check: F, error: ValidationError, desc: impl Into<String>) -> StringRule
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    StringRule {
        check: Box::new(check),
        error,
        desc: desc.into(),
    }
}

/// Decimal strings may have at most `places` digits after the point.
#[must_use]
pub fn decimal_max(places: usize) -> StringRule {
    string_rule(
        move |s| s.split_once('.').is_none_or(|(_, fraction)| fraction.len() <= places),
        format!("no more than {places} decimals"),
    )
}

impl fmt::Debug for StringRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringRule")
            .field("error", &self.error)
            .field("desc", &self.desc)
            .finish()
    }
}

impl Rule for StringRule {
    fn validate(&self, value: &dyn Inspect) -> Result<(), FieldError> {
        let value = value.value();
        if value.is_empty() {
            return Ok(());
        }
        match value {
            Value::Str(s) if (self.check)(&*s) => Ok(()),
            Value::Str(_) => Err(self.error.clone().into()),
            _ => Err(ValidationError::new("type", "must be either a string or byte slice").into()),
        }
    }

    fn describe(&self, _name: &str, acc: &mut SchemaAccumulator<'_>) -> Result<(), SchemaError> {
        acc.append_description(&self.desc);
        Ok(())
    }
}

// ============================================================================
// PATTERN
// ============================================================================

/// Strings must match a regular expression.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

/// Compiles `pattern`; the property schema gets it as `pattern`.
pub fn pattern(pattern: &str) -> Result<Pattern, regex::Error> {
    Ok(Pattern {
        regex: Regex::new(pattern)?,
    })
}

impl Rule for Pattern {
    fn validate(&self, value: &dyn Inspect) -> Result<(), FieldError> {
        let value = value.value();
        if value.is_empty() {
            return Ok(());
        }
        match value.as_str() {
            Some(s) if self.regex.is_match(s) => Ok(()),
            Some(_) => Err(ValidationError::new("match_invalid", "must be in a valid format")
                .with_param("pattern", self.regex.as_str().to_owned())
                .into()),
            None => Err(ValidationError::new("type", "must be either a string or byte slice").into()),
        }
    }

    fn describe(&self, _name: &str, acc: &mut SchemaAccumulator<'_>) -> Result<(), SchemaError> {
        acc.property().pattern = Some(self.regex.as_str().to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_custom_sees_raw_value() {
        let rule = custom(
            |v| match v.value().as_str() {
                Some("forbidden") => Err(ValidationError::custom("is forbidden")),
                _ => Ok(()),
            },
            "no forbidden words",
        );

        assert!(rule.validate(&String::from("fine")).is_ok());
        assert_eq!(
            rule.validate(&String::from("forbidden")).unwrap_err().to_string(),
            "is forbidden"
        );
    }

    #[test]
    fn test_by_looks_through_pointers() {
        let positive = by(
            |n: &i64| if *n > 0 { Ok(()) } else { Err(ValidationError::custom("must be positive")) },
            "positive",
        );

        assert!(positive.validate(&Box::new(4_i64)).is_ok());
        assert!(positive.validate(&Some(Box::new(4_i64))).is_ok());
        assert!(positive.validate(&None::<Box<i64>>).is_ok());
        assert_eq!(
            positive.validate(&Box::new(Some(-2_i64))).unwrap_err().to_string(),
            "must be positive"
        );
    }

    #[test]
    fn test_by_rejects_other_types() {
        let rule = by(|_: &u32| Ok(()), "anything");
        assert!(rule.validate(&String::new()).is_err());
    }

    #[rstest]
    #[case("10", None)]
    #[case("10.25", None)]
    #[case("10.255", Some("no more than 2 decimals"))]
    #[case("", None)]
    fn test_decimal_max(#[case] input: &str, #[case] expected: Option<&str>) {
        let result = decimal_max(2).validate(&input.to_owned());
        assert_eq!(result.err().map(|e| e.to_string()).as_deref(), expected);
    }

    #[test]
    fn test_string_rule_with_error_uses_error() {
        let rule = string_rule_with_error(
            |s| s.starts_with("acct_"),
            ValidationError::new("account", "must be an account id"),
            "account id",
        );
        let err = rule.validate(&String::from("x")).unwrap_err();
        assert_eq!(err.as_invalid().unwrap().code, "account");
        assert!(rule.validate(&5_i32).is_err());
    }

    #[test]
    fn test_pattern() {
        let rule = pattern(r"^[a-z]+$").unwrap();
        assert!(rule.validate(&String::from("abc")).is_ok());
        assert!(rule.validate(&String::from("ab1")).is_err());

        let mut required = Vec::new();
        let mut schema = Schema::string();
        rule.describe("f", &mut SchemaAccumulator::new(&mut required, &mut schema))
            .unwrap();
        assert_eq!(schema.pattern.as_deref(), Some("^[a-z]+$"));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(pattern("(").is_err());
    }
}
