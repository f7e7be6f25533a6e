//! Document construction helpers.

use std::collections::BTreeMap;

use apivalid::{Inspect, Schema};
use http::Method;
use indexmap::IndexMap;

use crate::JSON;
use crate::error::OpenApiError;
use crate::model::{Document, Info, MediaType, Operation, RequestBody, Response};

/// A basic OpenAPI 3.0.3 document with no paths.
pub fn doc_base(
    service: impl Into<String>,
    description: impl Into<String>,
    version: impl Into<String>,
) -> Document {
    Document {
        openapi: "3.0.3".to_owned(),
        info: Info {
            title: service.into(),
            description: description.into(),
            version: version.into(),
        },
        paths: IndexMap::new(),
    }
}

/// Stores `operation` at `path` under `method`, replacing any operation
/// already there. Methods without a slot in [`PathItem`] are ignored.
pub fn add_path(doc: &mut Document, path: &str, method: &Method, operation: Operation) {
    let item = doc.paths.entry(path.to_owned()).or_default();
    let slot = match *method {
        Method::GET => &mut item.get,
        Method::POST => &mut item.post,
        Method::PUT => &mut item.put,
        Method::PATCH => &mut item.patch,
        Method::DELETE => &mut item.delete,
        _ => {
            tracing::debug!(%method, path, "method not documented");
            return;
        }
    };
    *slot = Some(operation);
}

/// One schema is used as is; several become a `oneOf`.
fn body(mut schemas: Vec<Schema>) -> Schema {
    if schemas.len() == 1 {
        schemas.remove(0)
    } else {
        Schema::one_of(schemas)
    }
}

fn json_content(schemas: Vec<Schema>) -> IndexMap<String, MediaType> {
    IndexMap::from([(JSON.to_owned(), MediaType { schema: body(schemas) })])
}

/// A JSON request body accepting any of `schemas`.
pub fn request_body(schemas: Vec<Schema>) -> Result<RequestBody, OpenApiError> {
    if schemas.is_empty() {
        return Err(OpenApiError::Empty("request schemas"));
    }
    Ok(RequestBody {
        content: json_content(schemas),
    })
}

/// A JSON request body for the type `T`.
pub fn request_body_for<T: Inspect>() -> Result<RequestBody, OpenApiError> {
    request_body(vec![apivalid::generate_schema::<T>()?])
}

/// One documented response: a description and its possible bodies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseSpec {
    pub description: String,
    pub bodies: Vec<Schema>,
}

impl ResponseSpec {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            bodies: Vec::new(),
        }
    }

    pub fn body(mut self, schema: Schema) -> Self {
        self.bodies.push(schema);
        self
    }
}

/// Builds the responses object from status code to spec. A spec without
/// bodies documents a response without content.
pub fn responses(
    specs: BTreeMap<String, ResponseSpec>,
) -> Result<IndexMap<String, Response>, OpenApiError> {
    if specs.is_empty() {
        return Err(OpenApiError::Empty("responses"));
    }
    Ok(specs
        .into_iter()
        .map(|(status, spec)| {
            let content = if spec.bodies.is_empty() {
                IndexMap::new()
            } else {
                json_content(spec.bodies)
            };
            let response = Response {
                description: spec.description,
                content,
            };
            (status, response)
        })
        .collect())
}

// ============================================================================
// ENDPOINTS
// ============================================================================

/// One API operation for [`get`], [`post`], [`put`], [`patch`] and
/// [`delete`].
///
/// `response` is shorthand for a single `"200"` response described as `OK`;
/// an explicit `responses` map takes precedence over it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Endpoint {
    pub summary: String,
    pub description: String,
    pub requests: Vec<Schema>,
    pub response: Option<Schema>,
    pub responses: BTreeMap<String, ResponseSpec>,
}

impl Endpoint {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds an accepted request body; several become a `oneOf`.
    pub fn request(mut self, schema: Schema) -> Self {
        self.requests.push(schema);
        self
    }

    pub fn response(mut self, schema: Schema) -> Self {
        self.response = Some(schema);
        self
    }

    pub fn status(mut self, status: impl Into<String>, spec: ResponseSpec) -> Self {
        self.responses.insert(status.into(), spec);
        self
    }

    fn into_operation(self, operation_id: &str) -> Result<Operation, OpenApiError> {
        let request_body = if self.requests.is_empty() {
            None
        } else {
            Some(request_body(self.requests)?)
        };

        let mut specs = self.responses;
        if specs.is_empty()
            && let Some(schema) = self.response
        {
            specs.insert("200".to_owned(), ResponseSpec::new("OK").body(schema));
        }
        let responses = if specs.is_empty() {
            IndexMap::new()
        } else {
            responses(specs)?
        };

        Ok(Operation {
            operation_id: operation_id.to_owned(),
            summary: self.summary,
            description: self.description,
            request_body,
            responses,
        })
    }
}

fn add_endpoint(
    doc: &mut Document,
    path: &str,
    method: &Method,
    operation_id: &str,
    endpoint: Endpoint,
) -> Result<(), OpenApiError> {
    let operation = endpoint.into_operation(operation_id)?;
    add_path(doc, path, method, operation);
    Ok(())
}

/// Registers a GET endpoint on `doc`.
pub fn get(
    doc: &mut Document,
    path: &str,
    operation_id: &str,
    endpoint: Endpoint,
) -> Result<(), OpenApiError> {
    add_endpoint(doc, path, &Method::GET, operation_id, endpoint)
}

/// Registers a POST endpoint on `doc`.
pub fn post(
    doc: &mut Document,
    path: &str,
    operation_id: &str,
    endpoint: Endpoint,
) -> Result<(), OpenApiError> {
    add_endpoint(doc, path, &Method::POST, operation_id, endpoint)
}

/// Registers a PUT endpoint on `doc`.
pub fn put(
    doc: &mut Document,
    path: &str,
    operation_id: &str,
    endpoint: Endpoint,
) -> Result<(), OpenApiError> {
    add_endpoint(doc, path, &Method::PUT, operation_id, endpoint)
}

/// Registers a PATCH endpoint on `doc`.
pub fn patch(
    doc: &mut Document,
    path: &str,
    operation_id: &str,
    endpoint: Endpoint,
) -> Result<(), OpenApiError> {
    add_endpoint(doc, path, &Method::PATCH, operation_id, endpoint)
}

/// Registers a DELETE endpoint on `doc`.
pub fn delete(
    doc: &mut Document,
    path: &str,
    operation_id: &str,
    endpoint: Endpoint,
) -> Result<(), OpenApiError> {
    add_endpoint(doc, path, &Method::DELETE, operation_id, endpoint)
}
