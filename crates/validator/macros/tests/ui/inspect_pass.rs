//! Tests for the Inspect derive macro - successful cases.

use apivalid::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Default, Serialize, Deserialize, Inspect)]
#[serde(rename_all = "camelCase")]
#[inspect(rules, normalize)]
pub struct Account {
    account_id: String,
    #[serde(rename = "mail")]
    email: Option<String>,
    tags: Vec<String>,
    #[serde(skip)]
    #[inspect(skip)]
    cache: Option<std::sync::Arc<std::sync::Mutex<u32>>>,
    #[serde(flatten)]
    audit: Audit,
    #[inspect(no_rules)]
    note: String,
    r#type: Kind,
}

impl RuleSet for Account {
    fn rules() -> Vec<FieldRules> {
        vec![
            field!(account_id, required()),
            field!(email, length(3, 254)),
            field!(audit),
            field!(r#type, required()),
        ]
    }
}

impl Normalize for Account {
    fn normalize(&mut self) {
        apivalid::transform::trim_space(self);
    }
}

#[derive(Default, Serialize, Deserialize, Inspect)]
#[inspect(context_rules)]
pub struct Audit {
    created_by: String,
}

impl ContextRuleSet for Audit {
    fn rules(ctx: &Context) -> Vec<FieldRules> {
        if ctx.contains("strict") {
            vec![field!(created_by, required())]
        } else {
            vec![]
        }
    }
}

#[derive(Default, Serialize, Deserialize, Inspect)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    #[default]
    Personal,
    Business,
}

#[derive(Serialize, Deserialize, Inspect)]
#[inspect(value_rules)]
pub struct Cents(i64);

impl ValueRules for Cents {
    fn value_rules() -> Vec<std::sync::Arc<dyn Rule>> {
        rules![min(0)]
    }
}

#[derive(Inspect)]
pub struct Plain {
    #[inspect(skip_docs)]
    inner: Box<dyn Inspect>,
}

fn main() {
    let account = Account::default();
    let _ = apivalid::validate(&account);
    let _ = apivalid::generate_schema::<Account>();
    let _ = apivalid::generate_schema::<Cents>();
    let _ = apivalid::generate_schema::<Kind>();
    let _ = apivalid::generate_schema_for(&Plain {
        inner: Box::new(Cents(1)),
    });
}
