//! Schema synthesis over derived types.

use std::collections::BTreeMap;
use std::sync::Arc;

use apivalid::prelude::*;
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Default, Deserialize, Inspect)]
#[inspect(value_rules)]
struct PaymentMethod(String);

impl ValueRules for PaymentMethod {
    fn value_rules() -> Vec<Arc<dyn Rule>> {
        rules![in_list(["ach", "cc", "wire"])]
    }
}

#[derive(Debug, Default, Deserialize, Inspect)]
#[inspect(rules)]
struct Fee {
    payment_type: PaymentMethod,
    amount: f64,
    currency: Option<String>,
    #[serde(skip)]
    audit_id: u64,
    #[inspect(skip_docs)]
    trace: String,
}

impl RuleSet for Fee {
    fn rules() -> Vec<FieldRules> {
        vec![
            field!(payment_type, required()),
            field!(amount, required(), min(0.01), describe("Amount in major units.")),
            field!(currency, length(3, 3), example("EUR")),
        ]
    }
}

#[derive(Debug, Default, Deserialize, Inspect)]
#[inspect(rules)]
struct Base {
    id: String,
}

impl RuleSet for Base {
    fn rules() -> Vec<FieldRules> {
        vec![field!(id, required(), length(1, 8))]
    }
}

#[derive(Debug, Default, Deserialize, Inspect)]
#[inspect(rules)]
struct Line {
    sku: String,
    qty: i32,
}

impl RuleSet for Line {
    fn rules() -> Vec<FieldRules> {
        vec![field!(sku, required()), field!(qty, min(1))]
    }
}

#[derive(Debug, Default, Deserialize, Inspect)]
#[serde(rename_all = "PascalCase")]
#[inspect(rules)]
struct Order {
    #[serde(flatten)]
    base: Base,
    lines: Vec<Line>,
    labels: BTreeMap<String, Line>,
    note: Option<Box<Line>>,
}

impl RuleSet for Order {
    fn rules() -> Vec<FieldRules> {
        vec![
            field!(base),
            field!(lines, required()),
            field!(labels, key_in(["gift", "bulk"])),
        ]
    }
}

fn line_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "sku": { "type": "string" },
            "qty": { "type": "integer", "format": "int32", "minimum": 1.0 },
        },
        "required": ["sku"],
    })
}

#[test]
fn test_value_level_type_documents_its_enum() {
    let schema = generate_schema::<PaymentMethod>().unwrap();

    assert_eq!(
        serde_json::to_value(schema).unwrap(),
        json!({ "type": "string", "enum": ["ach", "cc", "wire"] })
    );
}

#[test]
fn test_struct_properties_and_rules() {
    let schema = serde_json::to_value(generate_schema::<Fee>().unwrap()).unwrap();

    assert_eq!(
        schema,
        json!({
            "type": "object",
            "properties": {
                "payment_type": { "type": "string", "enum": ["ach", "cc", "wire"] },
                "amount": {
                    "type": "number",
                    "format": "double",
                    "description": "Amount in major units.",
                    "minimum": 0.01,
                },
                "currency": {
                    "type": "string",
                    "example": "EUR",
                    "nullable": true,
                    "minLength": 3,
                    "maxLength": 3,
                },
            },
            "required": ["payment_type", "amount"],
        })
    );
}

#[test]
fn test_flattened_and_nested_schemas() {
    let schema = generate_schema::<Order>().unwrap();

    assert_eq!(
        schema.properties.keys().collect::<Vec<_>>(),
        ["id", "Lines", "Labels", "Note"]
    );
    assert_eq!(schema.required, ["id", "Lines"]);

    let id = &schema.properties["id"];
    assert_eq!((id.min_length, id.max_length), (Some(1), Some(8)));

    let json = serde_json::to_value(&schema).unwrap();
    assert_eq!(json["properties"]["Lines"]["items"], line_schema());
    assert_eq!(json["properties"]["Labels"]["additionalProperties"], line_schema());
    assert_eq!(json["properties"]["Labels"]["description"], "keys must be in (gift,bulk)");
    assert_eq!(json["properties"]["Note"]["nullable"], true);
}

#[test]
fn test_schema_is_idempotent() {
    let first = generate_schema::<Order>().unwrap();
    let second = generate_schema::<Order>().unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_keys_match_validation_error_keys() {
    let order = Order {
        base: Base { id: String::new() },
        lines: Vec::new(),
        ..Order::default()
    };

    let err = validate(&order).unwrap_err();
    let schema = generate_schema::<Order>().unwrap();

    for key in err.fields().unwrap().keys() {
        assert!(schema.properties.contains_key(key), "{key} not documented");
    }
}

// ============================================================================
// CONTEXT AND DYNAMIC FIELDS
// ============================================================================

#[derive(Debug, Default, Inspect)]
#[inspect(context_rules)]
struct Profile {
    nickname: String,
}

impl ContextRuleSet for Profile {
    fn rules(ctx: &Context) -> Vec<FieldRules> {
        if ctx.contains("strict") {
            vec![field!(nickname, required())]
        } else {
            vec![field!(nickname)]
        }
    }
}

#[test]
fn test_generator_context_selects_rules() {
    let loose = generate_schema::<Profile>().unwrap();
    let strict = SchemaGenerator::with_context(Context::new().with("strict", ()))
        .describe::<Profile>()
        .unwrap();

    assert!(loose.required.is_empty());
    assert_eq!(strict.required, ["nickname"]);
}

#[derive(Inspect)]
struct Envelope {
    kind: String,
    payload: Box<dyn Inspect>,
}

#[test]
fn test_dynamic_field_resolved_from_instance() {
    let by_type = generate_schema::<Envelope>().unwrap();
    assert_eq!(by_type.properties["payload"], Schema::any());

    let envelope = Envelope {
        kind: "fee".into(),
        payload: Box::new(Fee::default()),
    };
    let by_value = generate_schema_for(&envelope).unwrap();

    assert_eq!(by_value.properties["kind"], Schema::string());
    assert_eq!(by_value.properties["payload"], generate_schema::<Fee>().unwrap());
}

// ============================================================================
// SERIALIZED NAMES
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Inspect)]
#[serde(rename_all = "snake_case")]
enum Protocol {
    HTTPStatus,
    GrpcWeb,
}

#[derive(Debug, Serialize, Deserialize, Inspect)]
#[serde(rename_all = "camelCase")]
struct Endpoint {
    user_id2: String,
    http_url: String,
    protocol: Protocol,
}

#[test]
fn test_names_match_serde_output() {
    let endpoint = Endpoint {
        user_id2: "u".into(),
        http_url: "h".into(),
        protocol: Protocol::HTTPStatus,
    };
    let json = serde_json::to_value(&endpoint).unwrap();

    let schema = generate_schema::<Endpoint>().unwrap();
    let mut keys: Vec<&String> = schema.properties.keys().collect();
    let mut serialized: Vec<&String> = json.as_object().unwrap().keys().collect();
    keys.sort();
    serialized.sort();
    assert_eq!(keys, serialized);

    let variants = [Protocol::HTTPStatus, Protocol::GrpcWeb].map(|p| serde_json::to_value(p).unwrap());
    assert_eq!(generate_schema::<Protocol>().unwrap().enum_values, variants);
    assert_eq!(variants[0], json!("h_t_t_p_status"));
}
