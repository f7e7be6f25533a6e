//! Internal support utilities for the derive.
//!
//! Attribute parsing for `#[inspect(...)]` and the subset of `#[serde(...)]`
//! that decides serialized names, plus shared diagnostics.

pub mod attrs;
pub mod diag;
pub mod serde_attrs;
pub mod utils;
