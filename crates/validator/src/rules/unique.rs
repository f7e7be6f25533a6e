//! Uniqueness of sequence elements.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::error::{FieldError, SchemaError, ValidationError};
use crate::inspect::Inspect;
use crate::rule::Rule;
use crate::schema::SchemaAccumulator;
use crate::value::Value;

fn not_unique() -> FieldError {
    ValidationError::new("not_unique", "not unique").into()
}

fn must_be_slice(value: &Value<'_>) -> FieldError {
    ValidationError::new("type", "must be slice")
        .with_param("kind", value.kind())
        .into()
}

/// Fails when two elements of type `T` map to the same key.
pub struct UniqueBy<T, K> {
    key: Box<dyn Fn(&T) -> K + Send + Sync>,
    desc: String,
    _marker: PhantomData<fn(&T) -> K>,
}

/// Elements of a `Vec<T>` / `[T; N]` field must have distinct keys.
/// Elements may also be `Option<T>` or `Box<T>`; `None` elements are skipped.
///
/// ```rust
/// use apivalid::prelude::*;
///
/// let rule = unique_by(|s: &String| s.clone(), "payment types");
/// assert!(rule.validate(&vec!["ach".to_owned(), "cc".to_owned()]).is_ok());
/// assert!(rule.validate(&vec!["ach".to_owned(), "ach".to_owned()]).is_err());
/// ```
#[must_use]
pub fn unique_by<T, K, F>(key: F, desc: impl Into<String>) -> UniqueBy<T, K>
where
    T: Inspect,
    K: Eq + Hash,
    F: Fn(&T) -> K + Send + Sync + 'static,
{
    UniqueBy {
        key: Box::new(key),
        desc: desc.into(),
        _marker: PhantomData,
    }
}

impl<T, K> fmt::Debug for UniqueBy<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniqueBy").field("desc", &self.desc).finish()
    }
}

impl<T, K> Rule for UniqueBy<T, K>
where
    T: Inspect,
    K: Eq + Hash + 'static,
{
    fn validate(&self, value: &dyn Inspect) -> Result<(), FieldError> {
        let items = match value.value() {
            Value::Null => return Ok(()),
            Value::Seq(items) => items,
            other => return Err(must_be_slice(&other)),
        };

        let mut seen = HashSet::with_capacity(items.len());
        for item in items {
            let Some(item) = item.downcast_target::<T>()? else {
                continue;
            };
            if !seen.insert((self.key)(item)) {
                return Err(not_unique());
            }
        }
        Ok(())
    }

    fn describe(&self, _name: &str, acc: &mut SchemaAccumulator<'_>) -> Result<(), SchemaError> {
        acc.property().unique_items = true;
        Ok(())
    }
}

crate::rule! {
    /// Elements must be pairwise distinct, compared by their JSON form.
    pub Unique;
    validate(value) {
        let items = match value.value() {
            Value::Null => return Ok(()),
            Value::Seq(items) => items,
            other => return Err(must_be_slice(&other)),
        };
        let mut seen = HashSet::with_capacity(items.len());
        for item in items {
            if !seen.insert(item.value().to_json().to_string()) {
                return Err(not_unique());
            }
        }
        Ok(())
    }
    describe(name, acc) {
        acc.property().unique_items = true;
        Ok(())
    }
    fn unique();
}
