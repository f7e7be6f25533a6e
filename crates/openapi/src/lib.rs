//! # apivalid-openapi
//!
//! A small OpenAPI 3.0.3 document model and helpers that register endpoints
//! whose request and response bodies are schemas produced by
//! [`apivalid::generate_schema`].
//!
//! ```rust,ignore
//! use apivalid_openapi::{Endpoint, doc_base, post};
//!
//! let mut doc = doc_base("Shop API", "Example API", "1.0.0");
//! post(
//!     &mut doc,
//!     "/items",
//!     "createItem",
//!     Endpoint::new("Create an item")
//!         .request(apivalid::generate_schema::<Item>()?)
//!         .response(apivalid::generate_schema::<Item>()?),
//! )?;
//! println!("{}", serde_json::to_string_pretty(&doc)?);
//! ```

mod builder;
mod error;
mod model;

pub use builder::{
    Endpoint, ResponseSpec, add_path, delete, doc_base, get, patch, post, put, request_body,
    request_body_for, responses,
};
pub use error::OpenApiError;
pub use model::{Document, Info, MediaType, Operation, PathItem, RequestBody, Response};

/// The only media type bodies are documented under.
pub const JSON: &str = "application/json";
