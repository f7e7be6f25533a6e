//! The normalization traversal.
//!
//! Each value's own hook runs before its children are visited, so a struct
//! hook sees its fields as decoded and nested hooks run afterwards. `None`
//! values are skipped; map values are normalized in place. Normalization
//! never fails.

use crate::context::Context;
use crate::inspect::Inspect;

/// Normalizes `value` in place with an empty [`Context`].
pub fn normalize(value: &mut dyn Inspect) {
    normalize_with_context(value, &Context::new());
}

/// Normalizes `value` in place, handing `ctx` to context-carrying hooks.
#[tracing::instrument(level = "trace", skip_all)]
pub fn normalize_with_context(value: &mut dyn Inspect, ctx: &Context) {
    value.normalize_tree(ctx);
}
