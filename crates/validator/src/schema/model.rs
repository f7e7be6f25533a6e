//! OpenAPI 3.0 schema objects.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

/// An OpenAPI 3.0 schema object, restricted to the keywords rules describe.
///
/// Unset keywords are omitted on serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub nullable: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub deprecated: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub unique_items: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<Schema>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<Schema>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(b: &bool) -> bool {
    !*b
}

impl Schema {
    /// The unconstrained schema `{}`.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn typed(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn string() -> Self {
        Self::typed(SchemaType::String)
    }

    #[must_use]
    pub fn boolean() -> Self {
        Self::typed(SchemaType::Boolean)
    }

    #[must_use]
    pub fn integer(format: Option<&str>) -> Self {
        Self {
            format: format.map(str::to_owned),
            ..Self::typed(SchemaType::Integer)
        }
    }

    #[must_use]
    pub fn number(format: Option<&str>) -> Self {
        Self {
            format: format.map(str::to_owned),
            ..Self::typed(SchemaType::Number)
        }
    }

    #[must_use]
    pub fn object() -> Self {
        Self::typed(SchemaType::Object)
    }

    /// `type: array` with the given item schema.
    #[must_use]
    pub fn array(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::typed(SchemaType::Array)
        }
    }

    /// `type: object` whose values follow `values`.
    #[must_use]
    pub fn map(values: Schema) -> Self {
        Self {
            additional_properties: Some(Box::new(values)),
            ..Self::typed(SchemaType::Object)
        }
    }

    /// `oneOf` over the given schemas.
    #[must_use]
    pub fn one_of(schemas: Vec<Schema>) -> Self {
        Self {
            one_of: schemas,
            ..Self::default()
        }
    }

    /// Sets `nullable: true`.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Appends a description fragment, separated by a single space.
    pub fn append_description(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.description.is_empty() && !self.description.ends_with(' ') {
            self.description.push(' ');
        }
        self.description.push_str(text);
    }

    /// True if this schema describes a string.
    #[must_use]
    pub fn is_string(&self) -> bool {
        self.schema_type == Some(SchemaType::String)
    }

    /// True if this schema describes an array.
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.schema_type == Some(SchemaType::Array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serializes_only_set_keywords() {
        let mut schema = Schema::array(Schema::string());
        schema.unique_items = true;
        schema.min_items = Some(1);

        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            serde_json::json!({
                "type": "array",
                "uniqueItems": true,
                "minItems": 1,
                "items": { "type": "string" },
            })
        );
    }

    #[test]
    fn test_any_serializes_empty() {
        assert_eq!(serde_json::to_value(Schema::any()).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn test_append_description_separates_with_single_space() {
        let mut schema = Schema::string();
        schema.append_description("first");
        schema.append_description("second");
        assert_eq!(schema.description, "first second");

        let mut trailing = Schema::string();
        trailing.append_description("Must contain at least one alphabetic character. ");
        trailing.append_description("next");
        assert_eq!(
            trailing.description,
            "Must contain at least one alphabetic character. next"
        );
    }

    #[test]
    fn test_roundtrips_through_json() {
        let mut schema = Schema::object();
        schema.properties.insert("name".into(), Schema::string());
        schema.required.push("name".into());

        let json = serde_json::to_string(&schema).unwrap();
        let back: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(back, schema);
    }
}
