//! [`Inspect`] for scalars, standard containers, `serde_json::Value` and
//! chrono dates.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::hash::BuildHasher;

use indexmap::IndexMap;

use crate::context::Context;
use crate::error::SchemaError;
use crate::inspect::{Indirection, Inspect, Shape};
use crate::schema::{Schema, SchemaGenerator};
use crate::value::Value;

// ============================================================================
// SCALARS
// ============================================================================

macro_rules! impl_scalar {
    ($($ty:ty => |$this:ident| $value:expr, $schema:expr;)*) => {$(
        impl Inspect for $ty {
            #[allow(trivial_numeric_casts)]
            fn value(&self) -> Value<'_> {
                let $this = *self;
                $value
            }

            fn instance_schema(&self, generator: &SchemaGenerator) -> Result<Schema, SchemaError> {
                Self::describe(generator)
            }

            fn describe(_generator: &SchemaGenerator) -> Result<Schema, SchemaError> {
                Ok($schema)
            }
        }
    )*};
}

impl_scalar! {
    bool => |v| Value::Bool(v), Schema::boolean();
    i8 => |v| Value::Int(v as i64), Schema::integer(Some("int32"));
    i16 => |v| Value::Int(v as i64), Schema::integer(Some("int32"));
    i32 => |v| Value::Int(v as i64), Schema::integer(Some("int32"));
    i64 => |v| Value::Int(v), Schema::integer(Some("int64"));
    isize => |v| Value::Int(v as i64), Schema::integer(Some("int64"));
    u8 => |v| Value::Uint(v as u64), Schema::integer(Some("int32"));
    u16 => |v| Value::Uint(v as u64), Schema::integer(Some("int32"));
    u32 => |v| Value::Uint(v as u64), Schema::integer(Some("int64"));
    u64 => |v| Value::Uint(v), Schema::integer(Some("int64"));
    usize => |v| Value::Uint(v as u64), Schema::integer(Some("int64"));
    f32 => |v| Value::Float(f64::from(v)), Schema::number(Some("float"));
    f64 => |v| Value::Float(v), Schema::number(Some("double"));
}

impl Inspect for String {
    fn value(&self) -> Value<'_> {
        Value::Str(Cow::Borrowed(self))
    }

    fn for_each_string(&mut self, f: &mut dyn FnMut(&mut String)) {
        f(self);
    }

    fn instance_schema(&self, generator: &SchemaGenerator) -> Result<Schema, SchemaError> {
        Self::describe(generator)
    }

    fn describe(_generator: &SchemaGenerator) -> Result<Schema, SchemaError> {
        Ok(Schema::string())
    }
}

impl Inspect for &'static str {
    fn value(&self) -> Value<'_> {
        Value::Str(Cow::Borrowed(self))
    }

    fn instance_schema(&self, generator: &SchemaGenerator) -> Result<Schema, SchemaError> {
        Self::describe(generator)
    }

    fn describe(_generator: &SchemaGenerator) -> Result<Schema, SchemaError> {
        Ok(Schema::string())
    }
}

// ============================================================================
// INDIRECTION
// ============================================================================

impl<T: Inspect> Inspect for Option<T> {
    fn value(&self) -> Value<'_> {
        match self {
            Some(inner) => inner.value(),
            None => Value::Null,
        }
    }

    fn indirection(&self) -> Indirection<'_> {
        match self {
            Some(inner) => Indirection::Inner(inner),
            None => Indirection::Absent,
        }
    }

    fn shape(&self) -> Shape<'_> {
        match self {
            Some(inner) => inner.shape(),
            None => Shape::Absent,
        }
    }

    fn normalize_tree(&mut self, ctx: &Context) {
        if let Some(inner) = self {
            inner.normalize_tree(ctx);
        }
    }

    fn for_each_string(&mut self, f: &mut dyn FnMut(&mut String)) {
        if let Some(inner) = self {
            inner.for_each_string(f);
        }
    }

    fn instance_schema(&self, generator: &SchemaGenerator) -> Result<Schema, SchemaError> {
        match self {
            Some(inner) => Ok(inner.instance_schema(generator)?.nullable()),
            None => Self::describe(generator),
        }
    }

    fn describe(generator: &SchemaGenerator) -> Result<Schema, SchemaError> {
        Ok(T::describe(generator)?.nullable())
    }

    fn has_rules() -> bool {
        T::has_rules()
    }
}

impl<T: Inspect> Inspect for Box<T> {
    fn value(&self) -> Value<'_> {
        (**self).value()
    }

    fn indirection(&self) -> Indirection<'_> {
        Indirection::Inner(&**self)
    }

    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }

    fn normalize_tree(&mut self, ctx: &Context) {
        (**self).normalize_tree(ctx);
    }

    fn for_each_string(&mut self, f: &mut dyn FnMut(&mut String)) {
        (**self).for_each_string(f);
    }

    fn instance_schema(&self, generator: &SchemaGenerator) -> Result<Schema, SchemaError> {
        (**self).instance_schema(generator)
    }

    fn describe(generator: &SchemaGenerator) -> Result<Schema, SchemaError> {
        T::describe(generator)
    }

    fn has_rules() -> bool {
        T::has_rules()
    }
}

/// A dynamically typed field. Its schema can only be resolved from an
/// instance; the type alone describes as `{}`.
impl Inspect for Box<dyn Inspect> {
    fn value(&self) -> Value<'_> {
        (**self).value()
    }

    fn indirection(&self) -> Indirection<'_> {
        Indirection::Inner(&**self)
    }

    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }

    fn normalize_tree(&mut self, ctx: &Context) {
        (**self).normalize_tree(ctx);
    }

    fn for_each_string(&mut self, f: &mut dyn FnMut(&mut String)) {
        (**self).for_each_string(f);
    }

    fn instance_schema(&self, generator: &SchemaGenerator) -> Result<Schema, SchemaError> {
        (**self).instance_schema(generator)
    }

    fn describe(_generator: &SchemaGenerator) -> Result<Schema, SchemaError> {
        Ok(Schema::any())
    }

    fn has_rules() -> bool {
        true
    }
}

// ============================================================================
// SEQUENCES
// ============================================================================

fn elements<T: Inspect>(items: &[T]) -> Vec<&dyn Inspect> {
    items.iter().map(|item| item as &dyn Inspect).collect()
}

fn sequence_schema<T: Inspect>(
    items: &[T],
    generator: &SchemaGenerator,
) -> Result<Schema, SchemaError> {
    let item = match items.first() {
        Some(first) => first.instance_schema(generator)?,
        None => T::describe(generator)?,
    };
    Ok(Schema::array(item))
}

impl<T: Inspect> Inspect for Vec<T> {
    fn value(&self) -> Value<'_> {
        Value::Seq(elements(self))
    }

    fn shape(&self) -> Shape<'_> {
        if T::has_rules() {
            Shape::Sequence(elements(self))
        } else {
            Shape::Opaque
        }
    }

    fn normalize_tree(&mut self, ctx: &Context) {
        for item in self {
            item.normalize_tree(ctx);
        }
    }

    fn for_each_string(&mut self, f: &mut dyn FnMut(&mut String)) {
        for item in self {
            item.for_each_string(f);
        }
    }

    fn instance_schema(&self, generator: &SchemaGenerator) -> Result<Schema, SchemaError> {
        sequence_schema(self, generator)
    }

    fn describe(generator: &SchemaGenerator) -> Result<Schema, SchemaError> {
        Ok(Schema::array(T::describe(generator)?))
    }

    fn has_rules() -> bool {
        T::has_rules()
    }
}

impl<T: Inspect, const N: usize> Inspect for [T; N] {
    fn value(&self) -> Value<'_> {
        Value::Seq(elements(self))
    }

    fn shape(&self) -> Shape<'_> {
        if T::has_rules() {
            Shape::Sequence(elements(self))
        } else {
            Shape::Opaque
        }
    }

    fn normalize_tree(&mut self, ctx: &Context) {
        for item in self {
            item.normalize_tree(ctx);
        }
    }

    fn for_each_string(&mut self, f: &mut dyn FnMut(&mut String)) {
        for item in self {
            item.for_each_string(f);
        }
    }

    fn instance_schema(&self, generator: &SchemaGenerator) -> Result<Schema, SchemaError> {
        let mut schema = sequence_schema(self, generator)?;
        schema.min_items = Some(N as u64);
        schema.max_items = Some(N as u64);
        Ok(schema)
    }

    fn describe(generator: &SchemaGenerator) -> Result<Schema, SchemaError> {
        let mut schema = Schema::array(T::describe(generator)?);
        schema.min_items = Some(N as u64);
        schema.max_items = Some(N as u64);
        Ok(schema)
    }

    fn has_rules() -> bool {
        T::has_rules()
    }
}

// ============================================================================
// MAPS
// ============================================================================

fn map_schema<'a, V: Inspect>(
    mut values: impl Iterator<Item = &'a V>,
    generator: &SchemaGenerator,
) -> Result<Schema, SchemaError> {
    let value = match values.next() {
        Some(first) => first.instance_schema(generator)?,
        None => V::describe(generator)?,
    };
    Ok(Schema::map(value))
}

macro_rules! impl_map {
    ($map:ident <K, V $(, $hasher:ident)?>, sort = $sort:expr) => {
        impl<K, V $(, $hasher)?> Inspect for $map<K, V $(, $hasher)?>
        where
            K: Display + 'static,
            V: Inspect,
            $($hasher: BuildHasher + 'static,)?
        {
            fn value(&self) -> Value<'_> {
                Value::Map(self.entries())
            }

            fn shape(&self) -> Shape<'_> {
                if V::has_rules() {
                    Shape::Mapping(self.entries())
                } else {
                    Shape::Opaque
                }
            }

            fn normalize_tree(&mut self, ctx: &Context) {
                for value in self.values_mut() {
                    value.normalize_tree(ctx);
                }
            }

            fn for_each_string(&mut self, f: &mut dyn FnMut(&mut String)) {
                for value in self.values_mut() {
                    value.for_each_string(f);
                }
            }

            fn instance_schema(&self, generator: &SchemaGenerator) -> Result<Schema, SchemaError> {
                map_schema(self.values(), generator)
            }

            fn describe(generator: &SchemaGenerator) -> Result<Schema, SchemaError> {
                Ok(Schema::map(V::describe(generator)?))
            }

            fn has_rules() -> bool {
                V::has_rules()
            }
        }

        impl<K, V $(, $hasher)?> MapEntries for $map<K, V $(, $hasher)?>
        where
            K: Display + 'static,
            V: Inspect,
            $($hasher: BuildHasher + 'static,)?
        {
            fn entries(&self) -> Vec<(String, &dyn Inspect)> {
                let mut entries: Vec<(String, &dyn Inspect)> = self
                    .iter()
                    .map(|(k, v)| (k.to_string(), v as &dyn Inspect))
                    .collect();
                if $sort {
                    entries.sort_by(|a, b| a.0.cmp(&b.0));
                }
                entries
            }
        }
    };
}

/// Rendered-key entries of a map; unordered maps are sorted by key.
trait MapEntries {
    fn entries(&self) -> Vec<(String, &dyn Inspect)>;
}

impl_map!(HashMap<K, V, S>, sort = true);
impl_map!(BTreeMap<K, V>, sort = false);
impl_map!(IndexMap<K, V, S>, sort = false);

// ============================================================================
// JSON
// ============================================================================

/// Free-form JSON. Validation treats it as opaque; schema synthesis from an
/// instance infers the shape of the value it holds.
impl Inspect for serde_json::Value {
    fn value(&self) -> Value<'_> {
        use serde_json::Value as Json;
        match self {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Uint(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or_default())
                }
            }
            Json::String(s) => Value::Str(Cow::Borrowed(s)),
            Json::Array(items) => Value::Seq(elements(items)),
            Json::Object(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), v as &dyn Inspect))
                    .collect(),
            ),
        }
    }

    fn for_each_string(&mut self, f: &mut dyn FnMut(&mut String)) {
        use serde_json::Value as Json;
        match self {
            Json::String(s) => f(s),
            Json::Array(items) => {
                for item in items {
                    item.for_each_string(f);
                }
            }
            Json::Object(map) => {
                for value in map.values_mut() {
                    value.for_each_string(f);
                }
            }
            Json::Null | Json::Bool(_) | Json::Number(_) => {}
        }
    }

    fn instance_schema(&self, generator: &SchemaGenerator) -> Result<Schema, SchemaError> {
        use serde_json::Value as Json;
        Ok(match self {
            Json::Null => Schema::any(),
            Json::Bool(_) => Schema::boolean(),
            Json::Number(n) if n.is_f64() => Schema::number(None),
            Json::Number(_) => Schema::integer(None),
            Json::String(_) => Schema::string(),
            Json::Array(items) => sequence_schema(items, generator)?,
            Json::Object(map) => {
                let mut schema = Schema::object();
                for (key, value) in map {
                    schema
                        .properties
                        .insert(key.clone(), value.instance_schema(generator)?);
                }
                schema
            }
        })
    }

    fn describe(_generator: &SchemaGenerator) -> Result<Schema, SchemaError> {
        Ok(Schema::any())
    }
}

// ============================================================================
// DATES
// ============================================================================

macro_rules! impl_date {
    ($($ty:ty => |$this:ident| $render:expr, $format:literal;)*) => {$(
        impl Inspect for $ty {
            fn value(&self) -> Value<'_> {
                let $this = self;
                Value::Str(Cow::Owned($render))
            }

            fn instance_schema(&self, generator: &SchemaGenerator) -> Result<Schema, SchemaError> {
                Self::describe(generator)
            }

            fn describe(_generator: &SchemaGenerator) -> Result<Schema, SchemaError> {
                let mut schema = Schema::string();
                schema.format = Some($format.to_owned());
                Ok(schema)
            }
        }
    )*};
}

impl_date! {
    chrono::NaiveDate => |d| d.format("%Y-%m-%d").to_string(), "date";
    chrono::NaiveDateTime => |d| d.format("%Y-%m-%dT%H:%M:%S%.f").to_string(), "date-time";
    chrono::DateTime<chrono::Utc> => |d| d.to_rfc3339(), "date-time";
}
