//! # apivalid
//!
//! Declarative struct validation with matching OpenAPI 3 schema generation.
//!
//! One rule set per type drives three depth-first walks: decoding is followed
//! by [normalization](normalize()), [validation](validate()) aggregates every
//! failing field into a keyed error, and [schema synthesis](generate_schema)
//! documents the same rules under the same keys.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use apivalid::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Default, Deserialize, Inspect)]
//! #[inspect(rules, normalize)]
//! struct Signup {
//!     email: String,
//!     plan: String,
//!     age: Option<u32>,
//! }
//!
//! impl RuleSet for Signup {
//!     fn rules() -> Vec<FieldRules> {
//!         vec![
//!             field!(email, required(), length(3, 254)),
//!             field!(plan, required(), in_list(["free", "pro"])),
//!             field!(age, min(18)),
//!         ]
//!     }
//! }
//!
//! impl Normalize for Signup {
//!     fn normalize(&mut self) {
//!         apivalid::transform::trim_space(self);
//!     }
//! }
//!
//! let mut signup = Signup::default();
//! apivalid::decode_and_validate(br#"{"email":" a@b.io ","plan":"pro"}"#, &mut signup)?;
//! let schema = apivalid::generate_schema::<Signup>()?;
//! ```
//!
//! ## Traversals
//!
//! - **Validation**: [`validate`], [`validate_with_context`],
//!   [`validate_fields`] and the `decode_*` helpers.
//! - **Normalization**: [`normalize()`], [`normalize_with_context`].
//! - **Schema**: [`generate_schema`], [`generate_schema_for`],
//!   [`SchemaGenerator`].
//! - **Coverage**: [`missing_rules`].
//!
//! ## Rules
//!
//! Built-in rules live in [`rules`]; new ones implement [`Rule`] by hand or
//! through the [`rule!`] macro.

// `Error` embeds `ValidationErrors`; boxing it would add an allocation to
// every failing field for no practical benefit.
#![allow(clippy::result_large_err)]

extern crate self as apivalid;

mod binding;
mod context;
mod error;
pub mod expand;
mod impls;
mod inspect;
mod macros;
mod missing;
mod normalize;
pub mod prelude;
mod rule;
pub mod rules;
pub mod schema;
pub mod transform;
mod validate;
mod value;

pub use binding::FieldRules;
pub use context::Context;
pub use error::{BindingError, Error, FieldError, SchemaError, ValidationError, ValidationErrors};
pub use inspect::{
    Container, ContainerMeta, ContextNormalize, ContextRuleSet, Declared, FieldMeta, Flatten,
    Indirection, Inspect, Normalize, RuleSet, Shape, Structure, ValueRules,
};
pub use missing::{missing_rules, missing_rules_with_context};
pub use normalize::{normalize, normalize_with_context};
pub use rule::Rule;
pub use schema::{Schema, SchemaGenerator, SchemaType, generate_schema, generate_schema_for};
pub use validate::{
    decode_and_validate, decode_and_validate_with_context, decode_reader_and_validate,
    decode_reader_and_validate_with_context, validate, validate_fields, validate_with_context,
};
pub use value::Value;

#[cfg(feature = "derive")]
pub use apivalid_macros::Inspect;

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
