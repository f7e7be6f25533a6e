//! The dereferenced view of a value that rules inspect.
//!
//! [`Value`] flattens `Option`, `Box` and newtype indirection away, so a rule
//! only has to reason about a handful of scalar and collection kinds.

use std::borrow::Cow;
use std::fmt;

use crate::inspect::Inspect;

/// A borrowed, indirection-free view of an inspected value.
#[derive(Clone)]
pub enum Value<'a> {
    /// `None`, JSON `null`.
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(Cow<'a, str>),
    /// Ordered elements of a sequence or array.
    Seq(Vec<&'a dyn Inspect>),
    /// Entries of a map, keyed by the rendered key.
    Map(Vec<(String, &'a dyn Inspect)>),
    /// A struct; never considered empty.
    Struct,
}

impl<'a> Value<'a> {
    /// Returns true for [`Value::Null`].
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true for the "empty" values most rules accept unconditionally:
    /// null, `false`, zero, the empty string and empty collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(b) => !b,
            Self::Int(n) => *n == 0,
            Self::Uint(n) => *n == 0,
            Self::Float(n) => *n == 0.0,
            Self::Str(s) => s.is_empty(),
            Self::Seq(items) => items.is_empty(),
            Self::Map(entries) => entries.is_empty(),
            Self::Struct => false,
        }
    }

    /// Character count for strings, element count for collections.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Str(s) => Some(s.chars().count()),
            Self::Seq(items) => Some(items.len()),
            Self::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value as `f64`, if this is a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Uint(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Short name of the kind, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int64",
            Self::Uint(_) => "uint64",
            Self::Float(_) => "float64",
            Self::Str(_) => "string",
            Self::Seq(_) => "slice",
            Self::Map(_) => "map",
            Self::Struct => "struct",
        }
    }

    /// Loose equality against a JSON literal: numbers compare by value
    /// regardless of their integer/float representation.
    #[must_use]
    pub fn matches(&self, other: &serde_json::Value) -> bool {
        use serde_json::Value as Json;
        match (self, other) {
            (Self::Null, Json::Null) => true,
            (Self::Bool(a), Json::Bool(b)) => a == b,
            (Self::Str(a), Json::String(b)) => a == b,
            (Self::Int(a), Json::Number(b)) => match b.as_i64() {
                Some(b) => *a == b,
                None => b.as_f64() == Some(*a as f64),
            },
            (Self::Uint(a), Json::Number(b)) => match b.as_u64() {
                Some(b) => *a == b,
                None => b.as_f64() == Some(*a as f64),
            },
            (Self::Float(a), Json::Number(b)) => b.as_f64() == Some(*a),
            _ => false,
        }
    }

    /// Converts the view into an owned JSON value. Structs become `null`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Self::Null | Self::Struct => Json::Null,
            Self::Bool(b) => Json::Bool(*b),
            Self::Int(n) => Json::from(*n),
            Self::Uint(n) => Json::from(*n),
            Self::Float(n) => serde_json::Number::from_f64(*n).map_or(Json::Null, Json::Number),
            Self::Str(s) => Json::String(s.clone().into_owned()),
            Self::Seq(items) => items.iter().map(|item| item.value().to_json()).collect(),
            Self::Map(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.value().to_json()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("<nil>"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Uint(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
            Self::Seq(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item.value())?;
                }
                f.write_str("]")
            }
            Self::Map(entries) => {
                f.write_str("map[")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{k}:{}", v.value())?;
                }
                f.write_str("]")
            }
            Self::Struct => f.write_str("{...}"),
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Self::Uint(n) => f.debug_tuple("Uint").field(n).finish(),
            Self::Float(n) => f.debug_tuple("Float").field(n).finish(),
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::Seq(items) => f
                .debug_list()
                .entries(items.iter().map(|item| item.value()))
                .finish(),
            Self::Map(entries) => f
                .debug_map()
                .entries(entries.iter().map(|(k, v)| (k, v.value())))
                .finish(),
            Self::Struct => f.write_str("Struct"),
        }
    }
}
