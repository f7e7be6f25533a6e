//! The rule library.
//!
//! Every rule pairs a check with the schema keywords that document it. All
//! rules except [`required`], [`not_nil`], [`nil`] and [`empty`] accept empty
//! values, so optional fields only need `required()` when they are not.
//!
//! # Categories
//!
//! - **Presence**: [`required`], [`not_nil`], [`nil`], [`empty`]
//! - **Size**: [`length`], [`min`], [`max`]
//! - **Membership**: [`in_list`], [`key_in`], [`unique`], [`unique_by`]
//! - **Strings**: [`string_rule`], [`decimal_max`], [`pattern`],
//!   [`has_alphabetic`], [`non_credit_card_number`], [`date`]
//! - **Composition**: [`each`], [`when`], [`when_fn`], [`skip`], [`custom`],
//!   [`by`]
//! - **Documentation**: [`describe`], [`default`], [`example`], [`deprecate`]

mod absent;
mod alphabetic;
mod custom;
mod date;
mod doc;
mod each;
mod length;
mod one_of;
mod threshold;
mod unique;
mod when;

pub use absent::{Empty, Nil, NotNil, Required, empty, nil, not_nil, required};
pub use alphabetic::{HasAlphabetic, has_alphabetic, non_credit_card_number};
pub use custom::{By, Custom, Pattern, StringRule, by, custom, decimal_max, pattern, string_rule, string_rule_with_error};
pub use date::{Date, date};
pub use doc::{DefaultValue, Deprecate, Description, Example, default, deprecate, describe, example};
pub use each::{Each, each};
pub use length::{Length, length};
pub use one_of::{In, KeyIn, in_list, key_in};
pub use threshold::{Bound, Threshold, max, min};
pub use unique::{Unique, UniqueBy, unique, unique_by};
pub use when::{Skip, When, WhenFn, skip, when, when_fn};
