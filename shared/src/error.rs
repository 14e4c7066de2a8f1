//! Unified error type for the truckstop service
//!
//! Maps every failure a handler can see to one enum with a stable error code
//! and an HTTP status. Storage-level failures are converted into this type at
//! the service boundary; callers never match on backend-specific errors.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Result type for service and handler operations
pub type AppResult<T> = Result<T, AppError>;

/// Application error with a stable code and a human-readable message
#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// Malformed input rejected before it reaches the storage layer
    #[error("{0}")]
    Validation(String),

    /// Read on an absent identifier
    #[error("{0} not found")]
    NotFound(String),

    /// Durable backend unreachable
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    /// Database query failure
    #[error("database error: {0}")]
    Database(String),

    /// Anything else
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error for a resource ("schedule", "vendor", ...)
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Stable machine-readable code for the error body
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::Unavailable(_) => "backend_unavailable",
            Self::Database(_) => "database_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body: `{ "code": "...", "message": "..." }`
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "{self}");
        }
        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            AppError::validation("bad latitude").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::not_found("schedule").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Unavailable("probe failed".into()).http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::database("boom").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_names_resource() {
        let err = AppError::not_found("vendor");
        assert_eq!(err.to_string(), "vendor not found");
        assert_eq!(err.code(), "not_found");
    }
}
