//! Error types for schema normalization.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Exported document has no `schemas` mapping")]
    MissingSchemas,

    #[error("Schema `{name}` is not an object")]
    InvalidSchema { name: String },

    #[error("Schema `{name}` has no `id`")]
    MissingId { name: String },

    #[error("Schema `{name}` has a non-string `id`")]
    InvalidId { name: String },

    #[error("Root schema `{name}` not found in `schemas`")]
    MissingRootSchema { name: String },

    #[error("Unrecognized shape at {path}: {message}")]
    UnrecognizedShape { path: String, message: String },
}
