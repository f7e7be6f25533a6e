//! Field bindings.

use std::fmt;
use std::sync::Arc;

use smallvec::{SmallVec, smallvec};

use crate::rule::Rule;

// ============================================================================
// FIELD RULES
// ============================================================================

/// Binds an ordered rule list to one field of a container.
///
/// A binding names its field by Rust identifier. The key used for errors and
/// schema properties is resolved later against the container's field table;
/// until then it equals the identifier. Prefer the [`field!`](crate::field)
/// macro, which also checks the identifier at compile time.
#[derive(Clone)]
pub struct FieldRules {
    path: SmallVec<[&'static str; 2]>,
    key: &'static str,
    rules: Vec<Arc<dyn Rule>>,
}

impl FieldRules {
    /// Creates an empty binding for the field `ident`.
    #[must_use]
    pub fn new(ident: &'static str) -> Self {
        Self {
            path: smallvec![ident],
            key: ident,
            rules: Vec::new(),
        }
    }

    /// Appends a rule.
    #[must_use = "builder methods must be chained or built"]
    pub fn rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Appends already shared rules.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = Arc<dyn Rule>>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// The field's Rust identifier (the last path segment).
    #[must_use]
    pub fn ident(&self) -> &'static str {
        self.path.last().copied().unwrap_or(self.key)
    }

    /// Access path from the outermost container: flattened ancestors first.
    #[must_use]
    pub fn path(&self) -> &[&'static str] {
        &self.path
    }

    /// The resolved error/schema key.
    #[must_use]
    pub fn key(&self) -> &'static str {
        self.key
    }

    #[must_use]
    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    pub(crate) fn resolve(&mut self, key: &'static str) {
        self.key = key;
    }

    pub(crate) fn nest_under(&mut self, ident: &'static str) {
        self.path.insert(0, ident);
    }
}

impl fmt::Debug for FieldRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRules")
            .field("path", &self.path.join("."))
            .field("key", &self.key)
            .field("rules", &self.rules)
            .finish()
    }
}

/// Creates a [`FieldRules`] binding for a field of `Self`.
///
/// Must be used inside an `impl` block of the container (typically
/// [`RuleSet::rules`](crate::RuleSet::rules)); a misspelled field name is a
/// compile error.
///
/// ```rust,ignore
/// impl RuleSet for Fee {
///     fn rules() -> Vec<FieldRules> {
///         vec![
///             field!(payment_type, required(), in_list(["ach", "cc", "wire"])),
///             field!(amount, required(), min(0.0)),
///         ]
///     }
/// }
/// ```
#[macro_export]
macro_rules! field {
    ($name:ident $(, $rule:expr)* $(,)?) => {{
        let _ = |__this: &Self| {
            let _ = &__this.$name;
        };
        $crate::FieldRules::new(::core::stringify!($name))$(.rule($rule))*
    }};
}
