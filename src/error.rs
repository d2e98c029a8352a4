//! Error types for the data core
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::sanitize::SanitizeError;

// == Core Error Enum ==
/// Unified error type for the data core.
///
/// Validation failures are not represented here; they are returned as
/// [`ValidationResult`](crate::validation::ValidationResult) values.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Row store failure that survived every retry
    #[error("{operation} failed: {message}")]
    Remote { operation: String, message: String },

    /// Input could not be sanitized
    #[error("Sanitization failed: {0}")]
    Sanitize(#[from] SanitizeError),

    /// Malformed schema or rule
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Wraps a row-store failure with the operation label, keeping its message.
    pub fn remote(operation: impl Into<String>, source: impl std::fmt::Display) -> Self {
        CoreError::Remote {
            operation: operation.into(),
            message: source.to_string(),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = match &self {
            CoreError::Remote { .. } => StatusCode::BAD_GATEWAY,
            CoreError::Sanitize(_) => StatusCode::BAD_REQUEST,
            CoreError::InvalidSchema(_) => StatusCode::BAD_REQUEST,
            CoreError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the data core.
pub type Result<T> = std::result::Result<T, CoreError>;
