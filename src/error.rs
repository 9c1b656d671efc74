//! Error types for the API pipeline.
//!
//! Defines the closed error taxonomy that every failure reaching a client
//! is mapped into, and its rendering as an HTTP response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::response::error_response;

/// A single field-level validation violation.
///
/// `field` is the dot-joined path into the rejected input, or `"request"`
/// when the violation has no path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    /// Create a field error, substituting `"request"` for an empty path.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            field: if field.is_empty() {
                "request".to_string()
            } else {
                field
            },
            message: message.into(),
        }
    }
}

/// Unified error taxonomy for API operations.
///
/// Every variant carries its client-facing message; the status code is
/// fixed per variant. Validation folds its field detail into the display
/// message as one `field: message` line per violation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{}", join_violations(.0))]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    TooManyRequests(String),

    #[error("{0}")]
    Internal(String),

    #[error("{0}")]
    ServiceUnavailable(String),
}

pub(crate) fn join_violations(errors: &[FieldError]) -> String {
    if errors.is_empty() {
        return "Validation failed".to_string();
    }
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("\n")
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn bad_request_default() -> Self {
        Self::BadRequest("Bad request".to_string())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn unauthorized_default() -> Self {
        Self::Unauthorized("Unauthorized".to_string())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn forbidden_default() -> Self {
        Self::Forbidden("Forbidden".to_string())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn not_found_default() -> Self {
        Self::NotFound("Not found".to_string())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn conflict_default() -> Self {
        Self::Conflict("Conflict".to_string())
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::TooManyRequests(message.into())
    }

    pub fn too_many_requests_default() -> Self {
        Self::TooManyRequests("Too many requests".to_string())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn internal_server_error_default() -> Self {
        Self::Internal("Internal server error".to_string())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    pub fn service_unavailable_default() -> Self {
        Self::ServiceUnavailable("Service temporarily unavailable".to_string())
    }

    /// Build a validation error from collected violations.
    ///
    /// Empty paths are normalized to `"request"`; an empty list still
    /// yields a well-formed value displaying "Validation failed".
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::Validation(
            errors
                .into_iter()
                .map(|e| FieldError::new(e.field, e.message))
                .collect(),
        )
    }

    /// The HTTP status code fixed for this variant.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error_response(self.to_string(), self.status_code())
    }
}

/// Result type alias for handler and validator operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_messages_and_statuses() {
        assert_eq!(ApiError::bad_request_default().to_string(), "Bad request");
        assert_eq!(
            ApiError::bad_request_default().status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::not_found_default().to_string(), "Not found");
        assert_eq!(
            ApiError::not_found_default().status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::conflict_default().status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::too_many_requests_default().status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::internal_server_error_default().to_string(),
            "Internal server error"
        );
        assert_eq!(
            ApiError::service_unavailable_default().to_string(),
            "Service temporarily unavailable"
        );
        assert_eq!(
            ApiError::service_unavailable_default().status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_custom_message_preserved() {
        let err = ApiError::conflict("Resource already exists");
        assert_eq!(err.to_string(), "Resource already exists");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_validation_joins_violations() {
        let err = ApiError::validation(vec![
            FieldError::new("email", "Invalid email"),
            FieldError::new("age", "Must be positive"),
        ]);
        assert_eq!(
            err.to_string(),
            "email: Invalid email\nage: Must be positive"
        );
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_empty_validation_falls_back() {
        let err = ApiError::validation(vec![]);
        assert_eq!(err.to_string(), "Validation failed");
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_empty_field_path_becomes_request() {
        let err = ApiError::validation(vec![FieldError::new("", "Expected an object")]);
        assert_eq!(err.to_string(), "request: Expected an object");
    }
}
