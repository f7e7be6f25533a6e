//! Embedding expansion and key resolution.
//!
//! Validation, schema synthesis and the missing-rule check all run their
//! declared bindings through [`expand`] first, which is what keeps error keys
//! and schema property names identical.

use crate::binding::FieldRules;
use crate::context::Context;
use crate::error::BindingError;
use crate::inspect::Declared;

/// Resolves every binding against the container's field table and inlines
/// the bindings of flattened struct fields that declare rules of their own.
///
/// Inlined bindings keep their own serialized key (so `#[serde(flatten)]`
/// fields report flat keys) and record the flattened field in their path.
/// A binding naming an unknown or uninspectable field is an error.
pub fn expand(declared: Declared, ctx: &Context) -> Result<Vec<FieldRules>, BindingError> {
    let Declared { meta, rules } = declared;
    let mut out = Vec::with_capacity(rules.len());

    for mut binding in rules {
        let ident = binding.ident();
        let Some(field) = meta.field(ident) else {
            tracing::warn!(container = meta.name, field = ident, "rule target not found");
            return Err(BindingError::UnknownField {
                container: meta.name,
                field: ident.to_owned(),
            });
        };
        if !field.inspectable {
            return Err(BindingError::NotInspectable {
                container: meta.name,
                field: field.ident,
            });
        }

        if let Some(flatten) = field.flatten
            && let Some(child) = (flatten.declared)(ctx)
        {
            tracing::trace!(container = meta.name, field = field.ident, "expanding flattened rules");
            for mut inner in expand(child, ctx)? {
                inner.nest_under(field.ident);
                out.push(inner);
            }
            continue;
        }

        binding.resolve(field.key);
        out.push(binding);
    }

    Ok(out)
}
