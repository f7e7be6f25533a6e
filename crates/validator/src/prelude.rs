//! Prelude module for convenient imports.
//!
//! Provides a single `use apivalid::prelude::*;` import that brings in the
//! traits, the entry points, the error types and the whole rule library.
//!
//! # Examples
//!
//! ```rust,ignore
//! use apivalid::prelude::*;
//!
//! impl RuleSet for Signup {
//!     fn rules() -> Vec<FieldRules> {
//!         vec![
//!             field!(email, required(), length(3, 254)),
//!             field!(plan, in_list(["free", "pro"])),
//!         ]
//!     }
//! }
//! ```

// ============================================================================
// CORE: traits, bindings, errors
// ============================================================================

pub use crate::binding::FieldRules;
pub use crate::context::Context;
pub use crate::error::{
    BindingError, Error, FieldError, SchemaError, ValidationError, ValidationErrors,
};
pub use crate::inspect::{
    ContextNormalize, ContextRuleSet, Inspect, Normalize, RuleSet, Structure, ValueRules,
};
pub use crate::rule::Rule;
pub use crate::{field, rules};

#[cfg(feature = "derive")]
pub use apivalid_macros::Inspect;

// ============================================================================
// RULES
// ============================================================================

#[allow(clippy::wildcard_imports)]
pub use crate::rules::*;

// ============================================================================
// ENTRY POINTS
// ============================================================================

pub use crate::missing::missing_rules;
pub use crate::normalize::normalize;
pub use crate::schema::{Schema, SchemaGenerator, generate_schema, generate_schema_for};
pub use crate::validate::{decode_and_validate, validate, validate_with_context};
