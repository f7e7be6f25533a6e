//! Numeric bounds.
//!
//! Numeric strings are parsed according to the kind of the threshold, so a
//! `min(1)` bound on a `String` field accepts `"12"` and rejects `"1.5"`.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{FieldError, SchemaError, ValidationError};
use crate::inspect::Inspect;
use crate::rule::Rule;
use crate::schema::SchemaAccumulator;
use crate::value::Value;

/// A bound together with its numeric kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    Int(i64),
    Uint(u64),
    Float(f64),
}

impl Threshold {
    /// The kind name used in messages and as the `format` of string
    /// properties.
    #[must_use]
    pub fn kind(self) -> &'static str {
        match self {
            Self::Int(_) => "int64",
            Self::Uint(_) => "uint64",
            Self::Float(_) => "float64",
        }
    }

    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(n) => n as f64,
            Self::Uint(n) => n as f64,
            Self::Float(n) => n,
        }
    }

    /// Parses a numeric string as a number of this threshold's kind.
    fn parse(self, s: &str) -> Option<Value<'static>> {
        match self {
            Self::Int(_) => s.parse().ok().map(Value::Int),
            Self::Uint(_) => s.parse().ok().map(Value::Uint),
            Self::Float(_) => s.parse().ok().map(Value::Float),
        }
    }

    /// Orders `value` relative to this threshold.
    fn compare(self, value: &Value<'_>) -> Option<Ordering> {
        match (value, self) {
            (Value::Int(v), Self::Int(t)) => Some(v.cmp(&t)),
            (Value::Uint(v), Self::Uint(t)) => Some(v.cmp(&t)),
            (Value::Int(v), Self::Uint(t)) => Some(i128::from(*v).cmp(&i128::from(t))),
            (Value::Uint(v), Self::Int(t)) => Some(i128::from(*v).cmp(&i128::from(t))),
            (value, threshold) => value.as_f64()?.partial_cmp(&threshold.as_f64()),
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Uint(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
        }
    }
}

macro_rules! impl_from {
    ($variant:ident as $target:ty: $($ty:ty),+) => {$(
        impl From<$ty> for Threshold {
            fn from(n: $ty) -> Self {
                Self::$variant(<$target>::from(n))
            }
        }
    )+};
}

impl_from!(Int as i64: i8, i16, i32, i64);
impl_from!(Uint as u64: u8, u16, u32, u64);
impl_from!(Float as f64: f32, f64);

impl From<isize> for Threshold {
    fn from(n: isize) -> Self {
        Self::Int(n as i64)
    }
}

impl From<usize> for Threshold {
    fn from(n: usize) -> Self {
        Self::Uint(n as u64)
    }
}

/// A lower (`min`) or upper (`max`) bound, inclusive.
#[derive(Debug, Clone, Copy)]
pub struct Bound {
    threshold: Threshold,
    lower: bool,
}

/// Values must be greater than or equal to `threshold`.
#[must_use]
pub fn min(threshold: impl Into<Threshold>) -> Bound {
    Bound {
        threshold: threshold.into(),
        lower: true,
    }
}

/// Values must be less than or equal to `threshold`.
#[must_use]
pub fn max(threshold: impl Into<Threshold>) -> Bound {
    Bound {
        threshold: threshold.into(),
        lower: false,
    }
}

impl Bound {
    fn error(&self) -> ValidationError {
        let (code, message) = if self.lower {
            ("min", format!("must be no less than {}", self.threshold))
        } else {
            ("max", format!("must be no greater than {}", self.threshold))
        };
        ValidationError::new(code, message).with_param("threshold", self.threshold.to_string())
    }
}

impl Rule for Bound {
    fn validate(&self, value: &dyn Inspect) -> Result<(), FieldError> {
        let mut value = value.value();
        if value.is_empty() {
            return Ok(());
        }

        if let Value::Str(s) = &value {
            let kind = self.threshold.kind();
            value = self
                .threshold
                .parse(s)
                .ok_or_else(|| ValidationError::new("type", format!("must be {kind}")))?;
        }

        let Some(ordering) = self.threshold.compare(&value) else {
            return Err(ValidationError::new(
                "type",
                format!("type not supported: {}", value.kind()),
            )
            .into());
        };

        let ok = if self.lower {
            ordering != Ordering::Less
        } else {
            ordering != Ordering::Greater
        };
        if ok { Ok(()) } else { Err(self.error().into()) }
    }

    fn describe(&self, _name: &str, acc: &mut SchemaAccumulator<'_>) -> Result<(), SchemaError> {
        let property = acc.property();
        if property.is_string() {
            property.format = Some(self.threshold.kind().to_owned());
        }
        if self.lower {
            property.minimum = Some(self.threshold.as_f64());
        } else {
            property.maximum = Some(self.threshold.as_f64());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn check(rule: Bound, value: &dyn Inspect) -> Option<String> {
        rule.validate(value).err().map(|e| e.to_string())
    }

    #[rstest]
    #[case(min(3), &3_i32, None)]
    #[case(min(3), &2_i32, Some("must be no less than 3"))]
    #[case(max(3), &4_u64, Some("must be no greater than 3"))]
    #[case(max(3), &-10_i64, None)]
    #[case(min(1.5), &1_i32, Some("must be no less than 1.5"))]
    #[case(min(-1), &1_u8, None)]
    fn test_numbers(
        #[case] rule: Bound,
        #[case] value: &dyn Inspect,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(check(rule, value).as_deref(), expected);
    }

    #[rstest]
    #[case(min(10), "12", None)]
    #[case(min(10), "9", Some("must be no less than 10"))]
    #[case(min(10), "1.5", Some("must be int64"))]
    #[case(min(10_u32), "-1", Some("must be uint64"))]
    #[case(max(2.5), "abc", Some("must be float64"))]
    #[case(max(2.5), "2.25", None)]
    #[case(min(10), "", None)]
    fn test_numeric_strings(#[case] rule: Bound, #[case] value: &str, #[case] expected: Option<&str>) {
        assert_eq!(check(rule, &value.to_owned()).as_deref(), expected);
    }

    #[test]
    fn test_zero_is_empty_and_passes() {
        assert!(min(5).validate(&0_i32).is_ok());
    }

    #[test]
    fn test_describe_sets_bounds_and_string_format() {
        let mut required = Vec::new();
        let mut schema = Schema::string();
        let mut acc = SchemaAccumulator::new(&mut required, &mut schema);

        min(1).describe("n", &mut acc).unwrap();
        max(9.5).describe("n", &mut acc).unwrap();

        assert_eq!(schema.minimum, Some(1.0));
        assert_eq!(schema.maximum, Some(9.5));
        assert_eq!(schema.format.as_deref(), Some("float64"));
    }
}
