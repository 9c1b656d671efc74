//! Response envelope construction.
//!
//! Every endpoint returns the same JSON envelope shape, discriminated by a
//! boolean `success` flag. Field names are camelCase on the wire.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// The uniform response envelope.
///
/// Success envelopes carry the handler's data and a caller-chosen 2xx
/// status; error envelopes always carry `data: null` and the classified
/// error's status. The `meta` key is omitted entirely when absent.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub message: String,
    pub status: u16,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

/// Optional envelope metadata.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl ResponseMeta {
    /// Metadata carrying only pagination.
    pub fn paginated(pagination: PaginationMeta) -> Self {
        Self {
            pagination: Some(pagination),
            extra: serde_json::Map::new(),
        }
    }
}

/// Pagination metadata derived from `(total_items, page, limit)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub items_per_page: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// Build a success envelope response with the given status.
pub fn success_response<T: Serialize>(
    data: T,
    message: impl Into<String>,
    status: StatusCode,
    meta: Option<ResponseMeta>,
) -> Response {
    let body = ApiResponse {
        success: true,
        data,
        message: message.into(),
        status: status.as_u16(),
        timestamp: Utc::now(),
        meta,
    };

    (status, Json(body)).into_response()
}

/// Build an error envelope response; `data` is always `null`.
pub fn error_response(message: impl Into<String>, status: StatusCode) -> Response {
    let body = ApiResponse {
        success: false,
        data: Value::Null,
        message: message.into(),
        status: status.as_u16(),
        timestamp: Utc::now(),
        meta: None,
    };

    (status, Json(body)).into_response()
}

/// Derive pagination metadata. Pure arithmetic, no stored state.
///
/// `limit == 0` is an input-contract violation upstream; it yields
/// `total_pages = 0` here rather than dividing by zero.
pub fn calculate_pagination(total_items: u64, page: u64, limit: u64) -> PaginationMeta {
    let total_pages = if limit == 0 {
        0
    } else {
        total_items.div_ceil(limit)
    };

    PaginationMeta {
        current_page: page,
        total_pages,
        total_items,
        items_per_page: limit,
        has_next_page: page < total_pages,
        has_previous_page: page > 1,
    }
}
