//! Traversal context.
//!
//! A [`Context`] is a typed key/value bag handed to context-carrying
//! declarators ([`ContextRuleSet`](crate::ContextRuleSet) and
//! [`ContextNormalize`](crate::ContextNormalize)). It exists so that rule
//! selection can depend on request-scoped data (the caller's role, a tenant
//! flag, the operation being performed) without the data type itself carrying
//! that information.
//!
//! The traversal never mutates the context.
//!
//! # Examples
//!
//! ```rust
//! use apivalid::Context;
//!
//! let mut ctx = Context::new();
//! ctx.insert("operation", "create");
//!
//! let child = ctx.child();
//! assert_eq!(child.get::<&str>("operation"), Some(&"create"));
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// CONTEXT
// ============================================================================

/// Request-scoped values consulted by context-carrying declarators.
#[derive(Clone, Default)]
pub struct Context {
    data: HashMap<String, Arc<dyn Any + Send + Sync>>,
    parent: Option<Arc<Context>>,
}

impl Context {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context that falls back to `parent` for missing keys.
    #[must_use]
    pub fn with_parent(parent: Context) -> Self {
        Self {
            data: HashMap::new(),
            parent: Some(Arc::new(parent)),
        }
    }

    /// Adds a value to the context, replacing any previous value under `key`.
    pub fn insert<T: Send + Sync + 'static>(&mut self, key: impl Into<String>, value: T) {
        self.data.insert(key.into(), Arc::new(value));
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use = "builder methods must be chained or built"]
    pub fn with<T: Send + Sync + 'static>(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert(key, value);
        self
    }

    /// Gets a value by key, looking through parents.
    ///
    /// Returns `None` when the key is missing or holds a different type.
    #[must_use]
    pub fn get<T: 'static>(&self, key: &str) -> Option<&T> {
        if let Some(value) = self.data.get(key) {
            return value.downcast_ref::<T>();
        }
        self.parent.as_ref().and_then(|p| p.get(key))
    }

    /// Checks if a key exists in this context or any parent.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key) || self.parent.as_ref().is_some_and(|p| p.contains(key))
    }

    /// Creates a child context with this context as parent.
    #[must_use]
    pub fn child(&self) -> Self {
        Self::with_parent(self.clone())
    }

    /// Returns the number of items in the local context (excluding parent).
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Checks if the local context is empty (excluding parent).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.data.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("Context")
            .field("keys", &keys)
            .field("parent", &self.parent)
            .finish()
    }
}
