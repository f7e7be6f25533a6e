//! Error types for validation, binding and schema failures.
//!
//! Validation results are layered:
//!
//! - [`ValidationError`] is one rule's verdict on one value.
//! - [`FieldError`] is what a single key of a container maps to: either a
//!   leaf verdict or the aggregated errors of a nested container/collection.
//! - [`ValidationErrors`] is the aggregated, key-sorted map returned when one
//!   or more fields fail. Its `Display` form is flat and deterministic so it
//!   can be shown to an API client as-is, and it serializes as a JSON object.
//!
//! [`BindingError`] and [`SchemaError`] are configuration mistakes (a binding
//! that names a field the container does not have) and always abort the call.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A single rule verdict.
///
/// The `code` is stable and intended for programmatic handling; the `message`
/// is the human readable English text that `Display` prints.
///
/// # Examples
///
/// ```rust
/// use apivalid::ValidationError;
///
/// let error = ValidationError::new("length_out_of_range", "the length must be between 1 and 5")
///     .with_param("min", "1")
///     .with_param("max", "5");
///
/// assert_eq!(error.to_string(), "the length must be between 1 and 5");
/// assert_eq!(error.param("max"), Some("5"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error code, e.g. `"required"`, `"in_invalid"`.
    pub code: Cow<'static, str>,

    /// Human-readable error message.
    pub message: Cow<'static, str>,

    /// Ordered template parameters (typically 0-2).
    pub params: Vec<(Cow<'static, str>, Cow<'static, str>)>,
}

impl ValidationError {
    /// Creates a new validation error with a code and message.
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            params: Vec::new(),
        }
    }

    /// Creates an error with the generic `"custom"` code.
    pub fn custom(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new("custom", message)
    }

    /// Adds a parameter to the error.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Looks up a parameter value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_ref())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// FIELD ERROR
// ============================================================================

/// The error recorded under one key of a [`ValidationErrors`] map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// A rule bound to the field (or the field's value-level rules) failed.
    Invalid(ValidationError),
    /// The field holds a container or collection whose own members failed.
    Nested(ValidationErrors),
}

impl FieldError {
    /// Returns the leaf error, if this is not a nested error.
    #[must_use]
    pub fn as_invalid(&self) -> Option<&ValidationError> {
        match self {
            Self::Invalid(e) => Some(e),
            Self::Nested(_) => None,
        }
    }

    /// Returns the nested errors, if any.
    #[must_use]
    pub fn as_nested(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Nested(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(e) => fmt::Display::fmt(e, f),
            Self::Nested(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for FieldError {}

impl From<ValidationError> for FieldError {
    fn from(error: ValidationError) -> Self {
        Self::Invalid(error)
    }
}

impl From<ValidationErrors> for FieldError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Nested(errors)
    }
}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Invalid(e) => serializer.serialize_str(&e.message),
            Self::Nested(e) => e.serialize(serializer),
        }
    }
}

// ============================================================================
// VALIDATION ERRORS
// ============================================================================

/// Aggregated per-key validation failures.
///
/// Keys are field names (the serialized name), sequence indices or
/// stringified map keys. Iteration and rendering are always key-sorted.
///
/// ```rust
/// use apivalid::{ValidationError, ValidationErrors};
///
/// let mut inner = ValidationErrors::new();
/// inner.insert("label", ValidationError::new("required", "cannot be blank"));
///
/// let mut errors = ValidationErrors::new();
/// errors.insert("name", ValidationError::new("required", "cannot be blank"));
/// errors.insert("items", inner);
///
/// assert_eq!(
///     errors.to_string(),
///     "items: (label: cannot be blank.); name: cannot be blank."
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, FieldError>,
}

impl ValidationErrors {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error under `key`, replacing any previous entry.
    pub fn insert(&mut self, key: impl Into<String>, error: impl Into<FieldError>) {
        self.errors.insert(key.into(), error.into());
    }

    /// Gets the error recorded for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldError> {
        self.errors.get(key)
    }

    /// Returns the number of failing keys at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if no key failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterates over failing keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// Iterates over `(key, error)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Converts into a `Result`: `Ok(())` when empty, `Err(self)` otherwise.
    #[must_use = "result must be used"]
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return Ok(());
        }
        for (i, (key, error)) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            match error {
                FieldError::Invalid(e) => write!(f, "{key}: {e}")?,
                FieldError::Nested(nested) => write!(f, "{key}: ({nested})")?,
            }
        }
        f.write_str(".")
    }
}

impl std::error::Error for ValidationErrors {}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (key, error) in &self.errors {
            map.serialize_entry(key, error)?;
        }
        map.end()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = (&'a String, &'a FieldError);
    type IntoIter = std::collections::btree_map::Iter<'a, String, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

// ============================================================================
// CONFIGURATION ERRORS
// ============================================================================

/// A rule binding that cannot be resolved against its container.
///
/// These indicate a programming mistake in a declarator, never bad input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    /// The binding names a field the container does not declare.
    #[error("rule target `{field}` not found in `{container}`")]
    UnknownField {
        container: &'static str,
        field: String,
    },

    /// The field is excluded from inspection and cannot carry rules.
    #[error("rule target `{field}` in `{container}` is marked `#[inspect(skip)]`")]
    NotInspectable {
        container: &'static str,
        field: &'static str,
    },

    /// A flattened path segment did not resolve to a container.
    #[error("flattened field `{field}` in `{container}` is not a struct")]
    NotAContainer {
        container: &'static str,
        field: &'static str,
    },
}

/// Failure while synthesizing a schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A binding failed to resolve.
    #[error(transparent)]
    Binding(#[from] BindingError),

    /// A rule could not describe itself onto the property.
    #[error("cannot describe `{key}`: {reason}")]
    Describe {
        key: String,
        reason: Cow<'static, str>,
    },
}

impl SchemaError {
    /// Creates a describe failure for the property `key`.
    pub fn describe(key: impl Into<String>, reason: impl Into<Cow<'static, str>>) -> Self {
        Self::Describe {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// TOP-LEVEL ERROR
// ============================================================================

/// The error returned by the validation and decode entry points.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A value-level rule failed on the top-level value.
    #[error("{0}")]
    Rule(ValidationError),

    /// One or more fields or elements failed.
    #[error("{0}")]
    Fields(ValidationErrors),

    /// A declarator produced a binding that does not resolve.
    #[error(transparent)]
    Binding(#[from] BindingError),

    /// The raw input could not be decoded.
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
}

impl Error {
    /// Returns true for data-quality failures (`Rule` and `Fields`).
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Rule(_) | Self::Fields(_))
    }

    /// Returns the aggregated field errors, if this is a `Fields` error.
    #[must_use]
    pub fn fields(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Fields(errors) => Some(errors),
            _ => None,
        }
    }

    /// Splits a validation failure into the form recorded under a parent key.
    ///
    /// Configuration and decode errors are handed back unchanged.
    pub(crate) fn into_field_error(self) -> Result<FieldError, Self> {
        match self {
            Self::Rule(e) => Ok(FieldError::Invalid(e)),
            Self::Fields(e) => Ok(FieldError::Nested(e)),
            other => Err(other),
        }
    }
}

impl From<ValidationError> for Error {
    fn from(error: ValidationError) -> Self {
        Self::Rule(error)
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::Fields(errors)
    }
}

impl From<FieldError> for Error {
    fn from(error: FieldError) -> Self {
        match error {
            FieldError::Invalid(e) => Self::Rule(e),
            FieldError::Nested(e) => Self::Fields(e),
        }
    }
}
