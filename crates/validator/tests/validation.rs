//! Validation traversal over derived types.

use std::collections::BTreeMap;
use std::sync::Arc;

use apivalid::prelude::*;
use apivalid::{FieldError, validate_fields};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde::Deserialize;

// ============================================================================
// FIXTURES
// ============================================================================

#[derive(Debug, Default, Clone, Deserialize, Inspect)]
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
}

impl RuleSet for Fee {
    fn rules() -> Vec<FieldRules> {
        vec![
            field!(payment_type, required()),
            field!(amount, required(), min(0.01)),
            field!(currency, length(3, 3)),
        ]
    }
}

fn fee(method: &str) -> Fee {
    Fee {
        payment_type: PaymentMethod(method.to_owned()),
        amount: 12.5,
        currency: None,
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

fn line(sku: &str, qty: i32) -> Line {
    Line {
        sku: sku.to_owned(),
        qty,
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
            field!(labels),
            field!(note),
        ]
    }
}

fn order() -> Order {
    Order {
        base: Base { id: "o-1".into() },
        lines: vec![line("a", 1), line("b", 2)],
        labels: BTreeMap::new(),
        note: None,
    }
}

fn field_errors(result: Result<(), Error>) -> ValidationErrors {
    match result {
        Err(Error::Fields(errors)) => errors,
        other => panic!("expected field errors, got {other:?}"),
    }
}

fn leaf(errors: &ValidationErrors, key: &str) -> String {
    errors
        .get(key)
        .and_then(FieldError::as_invalid)
        .map(|e| e.message.to_string())
        .unwrap_or_else(|| panic!("no leaf error under {key}: {errors}"))
}

// ============================================================================
// STRUCTS
// ============================================================================

#[test]
fn test_valid_instance_passes() {
    assert!(validate(&fee("ach")).is_ok());
    assert!(validate(&order()).is_ok());
}

#[test]
fn test_one_invalid_field_reports_one_key() {
    let mut fee = fee("cc");
    fee.currency = Some("EURO".into());

    let errors = field_errors(validate(&fee));

    assert_eq!(errors.keys().collect::<Vec<_>>(), ["currency"]);
    assert_eq!(leaf(&errors, "currency"), "the length must be exactly 3");
}

#[test]
fn test_failing_fields_are_all_collected() {
    let fee = Fee {
        payment_type: PaymentMethod::default(),
        amount: -1.0,
        currency: Some("x".into()),
    };

    let errors = field_errors(validate(&fee));

    assert_eq!(errors.keys().collect::<Vec<_>>(), ["amount", "currency", "payment_type"]);
    assert_eq!(leaf(&errors, "payment_type"), "cannot be blank");
    assert_eq!(leaf(&errors, "amount"), "must be no less than 0.01");
}

#[test]
fn test_absent_top_level_value_passes() {
    assert!(validate(&None::<Fee>).is_ok());
}

// ============================================================================
// VALUE-LEVEL RULES
// ============================================================================

#[rstest]
#[case("ach")]
#[case("cc")]
#[case("wire")]
fn test_value_rules_accept_listed(#[case] method: &str) {
    assert!(validate(&PaymentMethod(method.into())).is_ok());
    assert!(validate(&fee(method)).is_ok());
}

#[test]
fn test_value_rules_reject_unlisted_wherever_the_type_appears() {
    let top = validate(&PaymentMethod("bitcoin".into())).unwrap_err();
    assert_eq!(top.to_string(), "must be one of 'ach', 'cc', 'wire' got 'bitcoin'");

    let errors = field_errors(validate(&fee("bitcoin")));
    assert_eq!(
        leaf(&errors, "payment_type"),
        "must be one of 'ach', 'cc', 'wire' got 'bitcoin'"
    );
}

#[test]
fn test_value_rules_apply_to_collection_elements() {
    let methods = vec![PaymentMethod("ach".into()), PaymentMethod("cash".into())];

    let errors = field_errors(validate(&methods));

    assert_eq!(errors.keys().collect::<Vec<_>>(), ["1"]);
}

// ============================================================================
// FLATTENING AND COLLECTIONS
// ============================================================================

#[test]
fn test_flattened_field_reports_flat_key() {
    let mut order = order();
    order.base.id = "much-too-long".into();

    let errors = field_errors(validate(&order));

    assert_eq!(errors.keys().collect::<Vec<_>>(), ["id"]);
    assert_eq!(leaf(&errors, "id"), "the length must be between 1 and 8");
}

#[test]
fn test_sequence_element_keyed_by_index() {
    let mut order = order();
    order.lines.push(line("c", -1));

    let errors = field_errors(validate(&order));

    let lines = errors.get("Lines").and_then(FieldError::as_nested).unwrap();
    assert_eq!(lines.keys().collect::<Vec<_>>(), ["2"]);
    let element = lines.get("2").and_then(FieldError::as_nested).unwrap();
    assert_eq!(leaf(element, "qty"), "must be no less than 1");
}

#[test]
fn test_map_entries_keyed_by_map_key() {
    let mut order = order();
    order.labels.insert("gift".into(), line("", 1));
    order.labels.insert("bulk".into(), line("x", 5));

    let errors = field_errors(validate(&order));

    let labels = errors.get("Labels").and_then(FieldError::as_nested).unwrap();
    assert_eq!(labels.keys().collect::<Vec<_>>(), ["gift"]);
}

#[test]
fn test_boxed_option_is_followed() {
    let mut order = order();
    order.note = Some(Box::new(line("", 1)));

    let errors = field_errors(validate(&order));

    assert!(errors.get("Note").and_then(FieldError::as_nested).is_some());
}

#[test]
fn test_absent_elements_are_skipped() {
    let lines = vec![None, Some(line("a", 1)), None, Some(line("", 1))];

    let errors = field_errors(validate(&lines));

    assert_eq!(errors.keys().collect::<Vec<_>>(), ["3"]);
    assert!(validate(&vec![None::<Line>, None]).is_ok());
}

#[test]
fn test_map_of_sequences_keys_nest() {
    let batches = BTreeMap::from([
        ("a".to_owned(), vec![None, Some(line("", 1))]),
        ("b".to_owned(), vec![Some(line("x", 1))]),
        ("c".to_owned(), vec![Some(line("y", -1)), Some(line("", 2))]),
    ]);

    let errors = field_errors(validate(&batches));

    assert_eq!(errors.keys().collect::<Vec<_>>(), ["a", "c"]);
    let c = errors.get("c").and_then(FieldError::as_nested).unwrap();
    assert_eq!(c.keys().collect::<Vec<_>>(), ["0", "1"]);
    assert_eq!(
        errors.to_string(),
        "a: (1: (sku: cannot be blank.).); c: (0: (qty: must be no less than 1.); 1: (sku: cannot be blank.).)."
    );
}

#[test]
fn test_nested_sequences_keys_nest() {
    let grid = vec![vec![line("a", 1)], vec![line("b", 1), line("c", -1)]];

    let errors = field_errors(validate(&grid));

    let row = errors.get("1").and_then(FieldError::as_nested).unwrap();
    let cell = row.get("1").and_then(FieldError::as_nested).unwrap();
    assert_eq!(leaf(cell, "qty"), "must be no less than 1");
}

#[test]
fn test_field_rules_failure_skips_recursion() {
    let mut order = order();
    order.lines.clear();

    let errors = field_errors(validate(&order));

    assert_eq!(leaf(&errors, "Lines"), "cannot be blank");
}

// ============================================================================
// CONTROL RULES, CONTEXT AND EXPLICIT BINDINGS
// ============================================================================

#[derive(Debug, Default, Inspect)]
#[inspect(context_rules)]
struct Transfer {
    kind: String,
    iban: String,
    email: String,
}

impl ContextRuleSet for Transfer {
    fn rules(ctx: &Context) -> Vec<FieldRules> {
        let strict = ctx.get::<bool>("strict").copied().unwrap_or(false);
        vec![
            field!(kind, in_list(["bank", "card"])),
            field!(
                iban,
                when(strict, "strict mode", rules![required()]),
            ),
            field!(email, skip("not validated for cards").when(true), required()),
        ]
    }
}

#[test]
fn test_context_selects_rules() {
    let transfer = Transfer {
        kind: "bank".into(),
        ..Transfer::default()
    };

    assert!(validate(&transfer).is_ok());

    let strict = Context::new().with("strict", true);
    let errors = field_errors(validate_with_context(&transfer, &strict));
    assert_eq!(errors.keys().collect::<Vec<_>>(), ["iban"]);
}

#[derive(Debug, Default, Deserialize, Inspect)]
#[inspect(rules)]
struct Payment {
    amount: f64,
    currency: String,
    #[serde(skip)]
    is_draft: bool,
}

impl RuleSet for Payment {
    fn rules() -> Vec<FieldRules> {
        vec![
            field!(
                amount,
                when_fn(|p: &Payment| !p.is_draft, "not draft", rules![required(), min(0.01)])
                    .otherwise(rules![min(0.0)]),
            ),
            field!(currency, required(), in_list(["USD", "EUR", "GBP"])),
        ]
    }
}

#[rstest]
#[case::final_with_amount(false, 10.0, None)]
#[case::final_without_amount(false, 0.0, Some("cannot be blank"))]
#[case::final_below_minimum(false, 0.001, Some("must be no less than 0.01"))]
#[case::draft_without_amount(true, 0.0, None)]
#[case::draft_negative(true, -1.0, Some("must be no less than 0"))]
fn test_condition_reads_sibling_field(
    #[case] is_draft: bool,
    #[case] amount: f64,
    #[case] expected: Option<&str>,
) {
    let payment = Payment {
        amount,
        currency: "USD".into(),
        is_draft,
    };

    let result = validate(&payment);

    match expected {
        None => assert!(result.is_ok(), "{result:?}"),
        Some(message) => {
            let errors = field_errors(result);
            assert_eq!(errors.keys().collect::<Vec<_>>(), ["amount"]);
            assert_eq!(leaf(&errors, "amount"), message);
        }
    }
}

#[test]
fn test_condition_on_sibling_documents_both_branches() {
    let schema = generate_schema::<Payment>().unwrap();

    assert_eq!(
        schema.properties["amount"].description,
        "when not draft: required, min 0.01 else: min 0"
    );
    assert_eq!(schema.required, ["currency"]);
}

#[derive(Debug, Default, Inspect)]
#[inspect(rules)]
struct Boxed {
    amount: Option<Box<i64>>,
    inner: Box<i64>,
}

fn even(n: &i64) -> Result<(), ValidationError> {
    if n % 2 == 0 {
        Ok(())
    } else {
        Err(ValidationError::custom("must be even"))
    }
}

impl RuleSet for Boxed {
    fn rules() -> Vec<FieldRules> {
        vec![field!(amount, by(even, "even")), field!(inner, by(even, "even"))]
    }
}

#[test]
fn test_typed_rules_see_through_pointers() {
    let valid = Boxed {
        amount: Some(Box::new(4)),
        inner: Box::new(2),
    };
    assert!(validate(&valid).is_ok());

    let absent = Boxed {
        amount: None,
        inner: Box::new(0),
    };
    assert!(validate(&absent).is_ok());

    let odd = Boxed {
        amount: Some(Box::new(3)),
        inner: Box::new(5),
    };
    let errors = field_errors(validate(&odd));
    assert_eq!(leaf(&errors, "amount"), "must be even");
    assert_eq!(leaf(&errors, "inner"), "must be even");
}

#[test]
fn test_explicit_bindings_replace_declared_ones() {
    let fee = fee("ach");

    let result = validate_fields(&fee, vec![FieldRules::new("amount").rule(max(10))]);

    let errors = field_errors(result);
    assert_eq!(leaf(&errors, "amount"), "must be no greater than 10");
}

#[test]
fn test_unknown_binding_is_fatal() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let fee = fee("ach");

    let result = validate_fields(&fee, vec![FieldRules::new("amonut").rule(required())]);

    assert!(matches!(
        result,
        Err(Error::Binding(BindingError::UnknownField { container: "Fee", .. }))
    ));
}

// ============================================================================
// RENDERING
// ============================================================================

#[test]
fn test_error_rendering_sorted_by_key() {
    let fee = Fee {
        payment_type: PaymentMethod("ach".into()),
        amount: -3.0,
        currency: Some("x".into()),
    };

    let err = validate(&fee).unwrap_err();

    assert_eq!(
        err.to_string(),
        "amount: must be no less than 0.01; currency: the length must be exactly 3."
    );
    assert_eq!(
        serde_json::to_value(err.fields().unwrap()).unwrap(),
        serde_json::json!({
            "amount": "must be no less than 0.01",
            "currency": "the length must be exactly 3",
        })
    );
}
