//! # apivalid-macros
//!
//! `#[derive(Inspect)]` for [apivalid](https://docs.rs/apivalid). Use it
//! through `apivalid::Inspect` (enabled by the default `derive` feature)
//! rather than depending on this crate directly.
//!
//! ## Examples
//!
//! ```ignore
//! use apivalid::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Inspect)]
//! #[serde(rename_all = "camelCase")]
//! #[inspect(rules)]
//! pub struct CreateFee {
//!     payment_type: PaymentMethod,
//!     amount: f64,
//!     #[inspect(no_rules)]
//!     memo: Option<String>,
//! }
//!
//! #[derive(Deserialize, Inspect)]
//! #[inspect(value_rules)]
//! pub struct PaymentMethod(String);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

extern crate proc_macro;

use proc_macro::TokenStream;

mod inspect;
mod support;

/// Derive macro for the `Inspect` trait.
///
/// Structs with named fields also get `Structure`: a static field table
/// keyed by Rust identifier, with the serialized name serde would use.
///
/// # Attributes
///
/// ## Container attributes (`#[inspect(...)]` on the type)
///
/// - `rules` - field bindings come from the type's `RuleSet` impl
/// - `context_rules` - field bindings come from its `ContextRuleSet` impl
/// - `value_rules` - newtypes and unit enums: rules come from `ValueRules`
/// - `normalize` - run the type's `Normalize` impl before validation
/// - `context_normalize` - run its `ContextNormalize` impl instead
///
/// ## Field attributes
///
/// - `#[inspect(skip)]` - never visited; the field type need not implement `Inspect`
/// - `#[inspect(skip_docs)]` - left out of generated schemas
/// - `#[inspect(no_rules)]` - intentionally unbound, not reported as missing
///
/// ## Serde attributes read
///
/// `rename_all` on the container; `rename`, `skip`, `skip_serializing` and
/// `flatten` on fields and variants. Flattened fields must be structs that
/// derive `Inspect` themselves.
///
/// # Example
///
/// ```ignore
/// #[derive(Serialize, Deserialize, Inspect)]
/// #[serde(rename_all = "PascalCase")]
/// #[inspect(rules, normalize)]
/// pub struct Person {
///     name: String,
///     email: String,
///     #[serde(skip)]
///     session: Option<String>,
///     #[serde(flatten)]
///     audit: Audit,
/// }
/// ```
#[proc_macro_derive(Inspect, attributes(inspect, serde))]
pub fn derive_inspect(input: TokenStream) -> TokenStream {
    inspect::derive(input)
}
