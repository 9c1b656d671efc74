//! api-core - the request-handling pipeline every route handler runs inside.
//!
//! Standardizes three per-endpoint concerns:
//! - a closed, client-safe error taxonomy ([`ApiError`]) that any raised
//!   value is classified into;
//! - one response envelope shape for success and failure
//!   ([`success_response`] / [`error_response`]);
//! - per-request correlation ids and structured timing/outcome logs
//!   ([`RequestPipeline`]).
//!
//! The pipeline defines no business endpoints; a host mounts its own
//! handlers through [`RequestPipeline::wrap`].

pub mod classify;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod response;
pub mod validate;
pub mod wrap;

pub use classify::ErrorClassifier;
pub use config::{Environment, PipelineConfig};
pub use context::{auth_token, client_ip, generate_request_id, user_agent, RequestContext};
pub use error::{ApiError, ApiResult, FieldError};
pub use response::{
    calculate_pagination, error_response, success_response, ApiResponse, PaginationMeta,
    ResponseMeta,
};
pub use validate::{
    validate_body, validate_deferred_params, validate_params, validate_query, Schema,
    SchemaViolations, SerdeSchema,
};
pub use wrap::{RequestPipeline, REQUEST_ID_HEADER};
