//! Schema synthesis.
//!
//! Schemas are built from type information: every [`Inspect`] type knows how
//! to describe itself, and struct types additionally run their declared rules'
//! `describe` over their properties, after the same expansion validation
//! uses. Property names therefore always equal validation error keys.
//!
//! ```rust,ignore
//! let schema = apivalid::generate_schema::<Order>()?;
//! assert!(schema.required.contains(&"id".to_owned()));
//! ```

mod accumulator;
mod model;

use std::sync::Arc;

pub use accumulator::SchemaAccumulator;
pub use model::{Schema, SchemaType};

use crate::context::Context;
use crate::error::SchemaError;
use crate::expand::expand;
use crate::inspect::{Inspect, Structure};
use crate::rule::Rule;

// ============================================================================
// GENERATOR
// ============================================================================

/// Settings shared by one schema synthesis pass.
///
/// The [`Context`] is what context-carrying declarators see while their
/// bindings are described; it defaults to an empty context.
#[derive(Debug, Clone, Default)]
pub struct SchemaGenerator {
    context: Context,
}

impl SchemaGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_context(context: Context) -> Self {
        Self { context }
    }

    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Describes the type `T`.
    pub fn describe<T: Inspect>(&self) -> Result<Schema, SchemaError> {
        T::describe(self)
    }

    /// Describes a representative value of a type, resolving dynamically
    /// typed fields from the instance.
    pub fn describe_value(&self, value: &dyn Inspect) -> Result<Schema, SchemaError> {
        value.instance_schema(self)
    }
}

/// Describes the type `T` with an empty context.
#[tracing::instrument(level = "debug", skip_all, fields(ty = std::any::type_name::<T>()))]
pub fn generate_schema<T: Inspect>() -> Result<Schema, SchemaError> {
    SchemaGenerator::new().describe::<T>()
}

/// Describes a representative value with an empty context.
#[tracing::instrument(level = "debug", skip_all)]
pub fn generate_schema_for(value: &dyn Inspect) -> Result<Schema, SchemaError> {
    SchemaGenerator::new().describe_value(value)
}

// ============================================================================
// STRUCTS
// ============================================================================

/// Schema of a struct: its properties, decorated by its declared rules.
///
/// Called by derived [`Inspect::describe`] (with `this = None`) and
/// [`Inspect::instance_schema`] (with the instance).
pub fn describe_struct<T: Structure>(
    generator: &SchemaGenerator,
    this: Option<&T>,
) -> Result<Schema, SchemaError> {
    let mut schema = properties_of::<T>(generator, this)?;

    let Some(declared) = T::declared(generator.context()) else {
        return Ok(schema);
    };
    let bindings = expand(declared, generator.context())?;

    let Schema {
        properties,
        required,
        ..
    } = &mut schema;
    for (key, property) in properties.iter_mut() {
        for binding in bindings.iter().filter(|b| b.key() == key.as_str()) {
            for rule in binding.rules() {
                rule.describe(key, &mut SchemaAccumulator::new(required, property))?;
            }
        }
    }

    Ok(schema)
}

/// The undecorated object schema of a struct: one property per serialized
/// field in declaration order, with flattened fields merged in.
///
/// Flattened fields are described through this function rather than
/// [`describe_struct`] so their rules are applied exactly once, by the
/// enclosing struct after expansion.
pub fn properties_of<T: Structure>(
    generator: &SchemaGenerator,
    this: Option<&T>,
) -> Result<Schema, SchemaError> {
    let meta = T::meta();
    let mut schema = Schema::object();

    for field in meta.fields {
        if field.skip_serializing || field.skip_docs {
            continue;
        }
        let property = T::field_schema(generator, this, field.ident)?;
        if field.flatten.is_some() {
            schema.properties.extend(property.properties);
            for name in property.required {
                if !schema.required.contains(&name) {
                    schema.required.push(name);
                }
            }
            continue;
        }
        schema.properties.insert(field.key.to_owned(), property);
    }

    Ok(schema)
}

/// Applies value-level rules' `describe` to a type's own schema.
pub fn describe_value_rules(
    mut schema: Schema,
    rules: &[Arc<dyn Rule>],
) -> Result<Schema, SchemaError> {
    // A value-level `required` has no enclosing object to mark.
    let mut required = Vec::new();
    for rule in rules {
        rule.describe("", &mut SchemaAccumulator::new(&mut required, &mut schema))?;
    }
    Ok(schema)
}
