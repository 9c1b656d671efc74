//! Error classification.
//!
//! Maps any raised value to exactly one [`ApiError`], as an ordered
//! decision list: explicit application errors are trusted as-is,
//! structurally recognized validation and storage failures get precise
//! client-facing messages, and everything else is redacted by environment.

use crate::config::Environment;
use crate::error::ApiError;
use crate::validate::SchemaViolations;

/// Vocabulary that marks an error chain as coming from the storage layer.
///
/// Heuristic by nature; kept in one place so the persistence technology
/// can change without touching the decision tree below.
const STORAGE_MARKERS: [&str; 6] = [
    "sqlx",
    "postgres",
    "sqlite",
    "database",
    "relation",
    "constraint",
];

/// Stateless classifier; the runtime environment is injected at
/// construction so redaction is testable under both modes.
#[derive(Debug, Clone, Copy)]
pub struct ErrorClassifier {
    environment: Environment,
}

impl ErrorClassifier {
    pub fn new(environment: Environment) -> Self {
        Self { environment }
    }

    /// Classify a raised error. First match wins:
    ///
    /// 1. already an [`ApiError`] - returned unchanged;
    /// 2. raw [`SchemaViolations`] - wrapped into a 422;
    /// 3. storage-layer error - sub-classified by message content;
    /// 4. anything else - 500, message redacted in production.
    pub fn classify(&self, error: &anyhow::Error) -> ApiError {
        if let Some(api_error) = error.downcast_ref::<ApiError>() {
            return api_error.clone();
        }

        if let Some(violations) = error.downcast_ref::<SchemaViolations>() {
            return ApiError::validation(violations.0.clone());
        }

        if looks_like_storage_error(error) {
            return classify_storage_error(error);
        }

        if self.environment.is_production() {
            ApiError::internal_server_error_default()
        } else {
            ApiError::internal_server_error(error.to_string())
        }
    }
}

/// Storage-error detection: a typed `sqlx::Error` anywhere in the chain,
/// or driver/database vocabulary in the chain's rendering.
fn looks_like_storage_error(error: &anyhow::Error) -> bool {
    if error.chain().any(|cause| cause.is::<sqlx::Error>()) {
        return true;
    }

    let rendered = format!("{error:?}").to_lowercase();
    STORAGE_MARKERS.iter().any(|marker| rendered.contains(marker))
}

/// Sub-classify a storage error by message content. Check order matters:
/// first substring match wins.
fn classify_storage_error(error: &anyhow::Error) -> ApiError {
    let message = format!("{error:#}").to_lowercase();

    if message.contains("unique") || message.contains("duplicate") {
        return ApiError::conflict("Resource already exists");
    }

    if message.contains("foreign key") {
        return ApiError::bad_request("Related resource not found");
    }

    if message.contains("not-null") || message.contains("null value") {
        return ApiError::bad_request("Required field is missing");
    }

    if message.contains("connection") || message.contains("refused") {
        return ApiError::service_unavailable("Database connection failed");
    }

    // unknown storage error, stated openly rather than misclassified
    ApiError::internal_server_error("Database operation failed")
}
