//! Conditional rules.
//!
//! [`when`] takes a boolean fixed when the declarator runs, which makes it a
//! function of the [`Context`](crate::Context) for
//! [`ContextRuleSet`](crate::ContextRuleSet) declarators. [`when_fn`] takes a
//! predicate over the struct holding the field, evaluated during validation.
//! Both document every branch.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{FieldError, SchemaError, ValidationError};
use crate::inspect::Inspect;
use crate::rule::{self, Rule};
use crate::schema::{Schema, SchemaAccumulator};

use super::one_of::render_literal;

// ============================================================================
// WHEN
// ============================================================================

/// Applies one rule list or the other depending on a condition.
#[derive(Debug, Clone)]
pub struct When {
    condition: bool,
    desc: String,
    then: Vec<Arc<dyn Rule>>,
    otherwise: Vec<Arc<dyn Rule>>,
}

/// Applies `rules` only when `condition` holds. `desc` names the condition
/// in the generated documentation.
///
/// ```rust
/// use apivalid::prelude::*;
///
/// let strict = true;
/// let rule = when(strict, "strict mode", rules![required()]).otherwise(rules![length(0, 10)]);
/// assert!(rule.validate(&String::new()).is_err());
/// ```
#[must_use]
pub fn when(condition: bool, desc: impl Into<String>, rules: Vec<Arc<dyn Rule>>) -> When {
    When {
        condition,
        desc: desc.into(),
        then: rules,
        otherwise: Vec::new(),
    }
}

impl When {
    /// Rules applied when the condition does not hold.
    #[must_use]
    pub fn otherwise(mut self, rules: Vec<Arc<dyn Rule>>) -> Self {
        self.otherwise = rules;
        self
    }
}

impl When {
    fn branch(&self) -> &[Arc<dyn Rule>] {
        if self.condition {
            &self.then
        } else {
            &self.otherwise
        }
    }
}

impl Rule for When {
    fn validate(&self, value: &dyn Inspect) -> Result<(), FieldError> {
        rule::apply(self.branch(), value)
    }

    fn validate_in(&self, value: &dyn Inspect, parent: &dyn Inspect) -> Result<(), FieldError> {
        rule::apply_in(self.branch(), value, parent)
    }

    /// Documents both branches, whatever the condition currently is.
    fn describe(&self, name: &str, acc: &mut SchemaAccumulator<'_>) -> Result<(), SchemaError> {
        describe_branches(name, &self.desc, &self.then, &self.otherwise, acc)
    }
}

// ============================================================================
// WHEN_FN
// ============================================================================

/// Like [`When`], with the condition computed from the struct holding the
/// field.
pub struct WhenFn<T> {
    condition: Box<dyn Fn(&T) -> bool + Send + Sync>,
    desc: String,
    then: Vec<Arc<dyn Rule>>,
    otherwise: Vec<Arc<dyn Rule>>,
    _marker: PhantomData<fn(&T)>,
}

/// Applies `rules` only when `condition` holds for the struct `T` that holds
/// the bound field.
///
/// ```rust,ignore
/// impl RuleSet for Payment {
///     fn rules() -> Vec<FieldRules> {
///         vec![field!(
///             amount,
///             when_fn(|p: &Payment| !p.is_draft, "not draft", rules![required(), min(0.01)])
///                 .otherwise(rules![min(0.0)])
///         )]
///     }
/// }
/// ```
///
/// Outside a struct binding (as a value-level rule, say) there is no `T` to
/// ask and validation fails.
#[must_use]
pub fn when_fn<T, F>(
    condition: F,
    desc: impl Into<String>,
    rules: Vec<Arc<dyn Rule>>,
) -> WhenFn<T>
where
    T: Inspect,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    WhenFn {
        condition: Box::new(condition),
        desc: desc.into(),
        then: rules,
        otherwise: Vec::new(),
        _marker: PhantomData,
    }
}

impl<T> WhenFn<T> {
    /// Rules applied when the condition does not hold.
    #[must_use]
    pub fn otherwise(mut self, rules: Vec<Arc<dyn Rule>>) -> Self {
        self.otherwise = rules;
        self
    }
}

impl<T> fmt::Debug for WhenFn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WhenFn")
            .field("type", &std::any::type_name::<T>())
            .field("desc", &self.desc)
            .field("then", &self.then)
            .field("otherwise", &self.otherwise)
            .finish()
    }
}

impl<T: Inspect> Rule for WhenFn<T> {
    fn validate(&self, _value: &dyn Inspect) -> Result<(), FieldError> {
        Err(ValidationError::new(
            "type",
            format!(
                "condition `{}` needs the {} holding the field",
                self.desc,
                std::any::type_name::<T>()
            ),
        )
        .into())
    }

    fn validate_in(&self, value: &dyn Inspect, parent: &dyn Inspect) -> Result<(), FieldError> {
        let holds = match parent.downcast_target::<T>()? {
            Some(parent) => (self.condition)(parent),
            None => false,
        };
        let rules = if holds { &self.then } else { &self.otherwise };
        rule::apply_in(rules, value, parent)
    }

    fn describe(&self, name: &str, acc: &mut SchemaAccumulator<'_>) -> Result<(), SchemaError> {
        describe_branches(name, &self.desc, &self.then, &self.otherwise, acc)
    }
}

fn describe_branches(
    name: &str,
    desc: &str,
    then: &[Arc<dyn Rule>],
    otherwise: &[Arc<dyn Rule>],
    acc: &mut SchemaAccumulator<'_>,
) -> Result<(), SchemaError> {
    let then = summarize(name, then)?;
    if !then.is_empty() {
        if desc.is_empty() {
            acc.append_description(&then);
        } else {
            acc.append_description(&format!("when {desc}: {then}"));
        }
    }

    let otherwise = summarize(name, otherwise)?;
    if !otherwise.is_empty() {
        acc.append_description(&format!("else: {otherwise}"));
    }
    Ok(())
}

/// One-line prose summary of what `rules` would document.
pub(crate) fn summarize(name: &str, rules: &[Arc<dyn Rule>]) -> Result<String, SchemaError> {
    if rules.is_empty() {
        return Ok(String::new());
    }

    let mut required = Vec::new();
    let mut scratch = Schema::default();
    {
        let mut acc = SchemaAccumulator::new(&mut required, &mut scratch);
        for rule in rules {
            rule.describe(name, &mut acc)?;
        }
    }

    let mut parts = Vec::new();
    if !scratch.description.is_empty() {
        parts.push(scratch.description.clone());
    }
    if !required.is_empty() {
        parts.push("required".to_owned());
    }
    if let Some(min) = scratch.minimum {
        parts.push(format!("min {min}"));
    }
    if let Some(max) = scratch.maximum {
        parts.push(format!("max {max}"));
    }
    if let Some(min) = scratch.min_length.or(scratch.min_items) {
        parts.push(format!("min length {min}"));
    }
    if let Some(max) = scratch.max_length.or(scratch.max_items) {
        parts.push(format!("max length {max}"));
    }
    if !scratch.enum_values.is_empty() {
        let values: Vec<String> = scratch.enum_values.iter().map(render_literal).collect();
        parts.push(format!("one of [{}]", values.join(", ")));
    }
    if scratch.unique_items {
        parts.push("unique".to_owned());
    }

    Ok(parts.join(", "))
}

// ============================================================================
// SKIP
// ============================================================================

/// Stops evaluation of the remaining rules of its binding.
#[derive(Debug, Clone)]
pub struct Skip {
    active: bool,
    desc: String,
}

/// Halts the rest of the binding (including recursion into the field).
/// `desc` is added to the field's documentation.
#[must_use]
pub fn skip(desc: impl Into<String>) -> Skip {
    Skip {
        active: true,
        desc: desc.into(),
    }
}

impl Skip {
    /// Halts only when `condition` holds.
    #[must_use]
    pub fn when(mut self, condition: bool) -> Self {
        self.active = condition;
        self
    }
}

impl Rule for Skip {
    fn validate(&self, _value: &dyn Inspect) -> Result<(), FieldError> {
        Ok(())
    }

    fn describe(&self, _name: &str, acc: &mut SchemaAccumulator<'_>) -> Result<(), SchemaError> {
        acc.append_description(&self.desc);
        Ok(())
    }

    fn halts(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{in_list, length, max, min, required, unique};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn description(rule: &dyn Rule) -> String {
        let mut required_list = Vec::new();
        let mut schema = Schema::string();
        rule.describe("f", &mut SchemaAccumulator::new(&mut required_list, &mut schema))
            .unwrap();
        schema.description
    }

    #[rstest]
    #[case(true, "", Some("cannot be blank"))]
    #[case(false, "", None)]
    #[case(false, "abcdefghijk", Some("the length must be no more than 10"))]
    fn test_branches(#[case] condition: bool, #[case] input: &str, #[case] expected: Option<&str>) {
        let rule = when(condition, "strict", crate::rules![required()])
            .otherwise(crate::rules![length(0, 10)]);

        let result = rule.validate(&input.to_owned());

        assert_eq!(result.err().map(|e| e.to_string()).as_deref(), expected);
    }

    #[test]
    fn test_describe_both_branches() {
        let rule = when(true, "type is card", crate::rules![required(), min(1), max(5)])
            .otherwise(crate::rules![in_list(["x", "y"]), unique()]);

        assert_eq!(
            description(&rule),
            "when type is card: required, min 1, max 5 else: one of [x, y], unique"
        );
    }

    #[test]
    fn test_describe_without_condition_name() {
        let rule = when(false, "", crate::rules![length(2, 4)]);
        assert_eq!(description(&rule), "min 2, max 4");
    }

    #[derive(Debug)]
    struct Draft {
        is_draft: bool,
    }

    impl Inspect for Draft {
        fn value(&self) -> crate::Value<'_> {
            crate::Value::Struct
        }

        fn instance_schema(&self, generator: &crate::SchemaGenerator) -> Result<Schema, SchemaError> {
            Self::describe(generator)
        }

        fn describe(_: &crate::SchemaGenerator) -> Result<Schema, SchemaError> {
            Ok(Schema::object())
        }
    }

    #[rstest]
    #[case(false, 0.0, Some("cannot be blank"))]
    #[case(true, 0.0, None)]
    #[case(true, -1.0, Some("must be no less than 0"))]
    fn test_when_fn_reads_parent(
        #[case] is_draft: bool,
        #[case] amount: f64,
        #[case] expected: Option<&str>,
    ) {
        let rule = when_fn(
            |d: &Draft| !d.is_draft,
            "not draft",
            crate::rules![required(), min(0.01)],
        )
        .otherwise(crate::rules![min(0.0)]);

        let result = rule.validate_in(&amount, &Draft { is_draft });

        assert_eq!(result.err().map(|e| e.to_string()).as_deref(), expected);
    }

    #[test]
    fn test_when_fn_without_parent_fails() {
        let rule = when_fn(|d: &Draft| d.is_draft, "draft", crate::rules![required()]);

        assert!(rule.validate(&String::from("x")).is_err());
        assert!(rule.validate_in(&String::from("x"), &String::new()).is_err());
    }

    #[test]
    fn test_when_fn_describes_both_branches() {
        let rule = when_fn(|d: &Draft| !d.is_draft, "not draft", crate::rules![required()])
            .otherwise(crate::rules![min(0)]);

        assert_eq!(description(&rule), "when not draft: required else: min 0");
    }

    #[test]
    fn test_skip_halts_only_when_active() {
        assert!(skip("legacy").halts());
        assert!(!skip("legacy").when(false).halts());
        assert_eq!(description(&skip("ignored for legacy clients")), "ignored for legacy clients");
    }
}
