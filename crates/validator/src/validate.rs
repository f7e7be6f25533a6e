//! The validation traversal and the decode-then-validate entry points.
//!
//! Validation is a depth-first walk driven by [`Shape`]:
//!
//! - absent values and values without rules pass;
//! - structs run their declared bindings, recursing into every bound field
//!   whose rules all passed;
//! - newtypes and unit enums run their value-level rules;
//! - sequences and maps whose elements carry rules validate every element,
//!   keyed by index or map key.
//!
//! Failures of one container are aggregated into a single
//! [`ValidationErrors`]; configuration mistakes abort the walk.

use std::io::Read;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::binding::FieldRules;
use crate::context::Context;
use crate::error::{BindingError, Error, FieldError, ValidationErrors};
use crate::expand::expand;
use crate::inspect::{Container, Declared, Inspect, Shape, Structure};
use crate::normalize::normalize_with_context;
use crate::rule::{self, Rule};

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Validates `value` with an empty [`Context`].
///
/// ```rust,ignore
/// apivalid::validate(&order)?;
/// ```
pub fn validate(value: &dyn Inspect) -> Result<(), Error> {
    validate_with_context(value, &Context::new())
}

/// Validates `value`, handing `ctx` to context-carrying declarators.
#[tracing::instrument(level = "debug", skip_all)]
pub fn validate_with_context(value: &dyn Inspect, ctx: &Context) -> Result<(), Error> {
    let result = validate_dyn(value, ctx);
    if let Err(error) = &result
        && !error.is_validation()
    {
        tracing::warn!(%error, "validation aborted");
    }
    result
}

/// Validates a struct against explicit bindings instead of its declared
/// ones. Bindings are expanded and resolved exactly like declared bindings.
#[tracing::instrument(level = "debug", skip_all, fields(ty = T::meta().name))]
pub fn validate_fields<T: Structure>(value: &T, bindings: Vec<FieldRules>) -> Result<(), Error> {
    let ctx = Context::new();
    let bindings = expand(Declared::new(T::meta(), bindings), &ctx)?;
    validate_bindings(value, &bindings, &ctx)
}

// ============================================================================
// DECODE
// ============================================================================

/// Decodes JSON into `target`, normalizes it and validates it.
///
/// A decode failure is returned as [`Error::Decode`] and leaves `target`
/// untouched.
pub fn decode_and_validate<T>(bytes: &[u8], target: &mut T) -> Result<(), Error>
where
    T: DeserializeOwned + Inspect,
{
    decode_and_validate_with_context(bytes, target, &Context::new())
}

/// [`decode_and_validate`] with a [`Context`].
#[tracing::instrument(level = "debug", skip_all, fields(ty = std::any::type_name::<T>(), len = bytes.len()))]
pub fn decode_and_validate_with_context<T>(
    bytes: &[u8],
    target: &mut T,
    ctx: &Context,
) -> Result<(), Error>
where
    T: DeserializeOwned + Inspect,
{
    *target = serde_json::from_slice(bytes)?;
    normalize_with_context(target, ctx);
    validate_with_context(target, ctx)
}

/// Reads one JSON document from `reader` into `target`, normalizes it and
/// validates it.
pub fn decode_reader_and_validate<T, R>(reader: R, target: &mut T) -> Result<(), Error>
where
    T: DeserializeOwned + Inspect,
    R: Read,
{
    decode_reader_and_validate_with_context(reader, target, &Context::new())
}

/// [`decode_reader_and_validate`] with a [`Context`].
#[tracing::instrument(level = "debug", skip_all, fields(ty = std::any::type_name::<T>()))]
pub fn decode_reader_and_validate_with_context<T, R>(
    reader: R,
    target: &mut T,
    ctx: &Context,
) -> Result<(), Error>
where
    T: DeserializeOwned + Inspect,
    R: Read,
{
    *target = serde_json::from_reader(reader)?;
    normalize_with_context(target, ctx);
    validate_with_context(target, ctx)
}

// ============================================================================
// TRAVERSAL
// ============================================================================

fn validate_dyn(value: &dyn Inspect, ctx: &Context) -> Result<(), Error> {
    match value.shape() {
        Shape::Absent | Shape::Opaque => Ok(()),
        Shape::Container(container) => {
            let Some(declared) = container.declared_rules(ctx) else {
                return Ok(());
            };
            let bindings = expand(declared, ctx)?;
            validate_bindings(container, &bindings, ctx)
        }
        Shape::Value(rules) => rule::apply(&rules, value).map_err(Error::from),
        Shape::Sequence(items) => validate_entries(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| (i.to_string(), item)),
            ctx,
        ),
        Shape::Mapping(entries) => validate_entries(entries, ctx),
    }
}

fn validate_entries<'a>(
    entries: impl IntoIterator<Item = (String, &'a dyn Inspect)>,
    ctx: &Context,
) -> Result<(), Error> {
    let mut errors = ValidationErrors::new();
    for (key, item) in entries {
        if let Err(error) = validate_dyn(item, ctx) {
            tracing::trace!(key = %key, "element failed");
            errors.insert(key, error.into_field_error()?);
        }
    }
    errors.into_result().map_err(Error::Fields)
}

fn validate_bindings(
    container: &dyn Container,
    bindings: &[FieldRules],
    ctx: &Context,
) -> Result<(), Error> {
    let mut errors = ValidationErrors::new();
    for binding in bindings {
        let Some((parent, value)) = resolve(container, binding)? else {
            continue;
        };
        if let Some(error) = check_field(value, parent, binding.rules(), ctx)? {
            tracing::trace!(field = binding.key(), %error, "field failed");
            errors.insert(binding.key(), error);
        }
    }
    errors.into_result().map_err(Error::Fields)
}

/// Follows a binding's path from `container` to the bound field, returning
/// the struct that holds it along with the field. A `None` flattened
/// ancestor yields `Ok(None)`.
fn resolve<'a>(
    container: &'a dyn Container,
    binding: &FieldRules,
) -> Result<Option<(&'a dyn Inspect, &'a dyn Inspect)>, BindingError> {
    let path = binding.path();
    let (parents, last) = path.split_at(path.len().saturating_sub(1));

    let mut current = container;
    for &segment in parents {
        let meta = current.container_meta();
        let child = current.field(segment).ok_or_else(|| unknown(meta.name, segment))?;
        match child.shape() {
            Shape::Container(inner) => current = inner,
            Shape::Absent => return Ok(None),
            _ => {
                tracing::warn!(container = meta.name, field = segment, "flattened field is not a struct");
                return Err(BindingError::NotAContainer {
                    container: meta.name,
                    field: segment,
                });
            }
        }
    }

    let ident = last.first().copied().unwrap_or(binding.key());
    current
        .field(ident)
        .map(|value| Some((current.as_inspect(), value)))
        .ok_or_else(|| unknown(current.container_meta().name, ident))
}

fn unknown(container: &'static str, field: &str) -> BindingError {
    tracing::warn!(container, field, "rule target not found");
    BindingError::UnknownField {
        container,
        field: field.to_owned(),
    }
}

/// Runs a binding's rules, then recurses into the field if none failed.
///
/// Returns the error to record under the field's key, if any.
fn check_field(
    value: &dyn Inspect,
    parent: &dyn Inspect,
    rules: &[Arc<dyn Rule>],
    ctx: &Context,
) -> Result<Option<FieldError>, Error> {
    for rule in rules {
        if rule.halts() {
            return Ok(None);
        }
        if let Err(error) = rule.validate_in(value, parent) {
            return Ok(Some(error));
        }
    }

    match validate_dyn(value, ctx) {
        Ok(()) => Ok(None),
        Err(error) => error.into_field_error().map(Some),
    }
}
