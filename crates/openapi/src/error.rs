use apivalid::SchemaError;

/// Failure while building a document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OpenApiError {
    /// A request body or response map was built from nothing.
    #[error("no {0} given")]
    Empty(&'static str),

    /// A body schema could not be generated.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
