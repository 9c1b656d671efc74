//! Per-request context derived from inbound request metadata.
//!
//! All operations here are pure reads of headers and the request line;
//! nothing mutates the request. The context lives for a single request
//! and is never persisted.

use axum::http::{header, HeaderMap, Request};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Correlation and caller metadata for one request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    pub request_id: String,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub path: String,
    pub method: String,
}

impl RequestContext {
    /// Assemble the context from a request, generating a request id when
    /// none is supplied.
    pub fn from_request<B>(request: &Request<B>, request_id: Option<String>) -> Self {
        Self {
            request_id: request_id.unwrap_or_else(generate_request_id),
            client_ip: client_ip(request.headers()),
            user_agent: user_agent(request.headers()),
            timestamp: Utc::now(),
            path: request.uri().path().to_string(),
            method: request.method().to_string(),
        }
    }
}

/// Generate a unique request id (UUID v4, hyphenated).
///
/// This is a trace/debug token, not a security token.
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Resolve the client IP from forwarding headers, in priority order:
/// `X-Forwarded-For` (first entry), `X-Real-IP`, `CF-Connecting-IP`,
/// `X-Vercel-Forwarded-For` (first entry).
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded_for) = header_str(headers, "x-forwarded-for") {
        if let Some(first) = forwarded_for.split(',').next() {
            return Some(first.trim().to_string());
        }
    }

    if let Some(real_ip) = header_str(headers, "x-real-ip") {
        return Some(real_ip.to_string());
    }

    // Cloudflare
    if let Some(cf_ip) = header_str(headers, "cf-connecting-ip") {
        return Some(cf_ip.to_string());
    }

    // Vercel
    if let Some(vercel) = header_str(headers, "x-vercel-forwarded-for") {
        if let Some(first) = vercel.split(',').next() {
            return Some(first.trim().to_string());
        }
    }

    None
}

/// Raw `User-Agent` header value, if present.
pub fn user_agent(headers: &HeaderMap) -> Option<String> {
    header_str(headers, "user-agent").map(String::from)
}

/// Extract the bearer token from the `Authorization` header.
///
/// Returns the token only when the scheme is "bearer" (case-insensitive)
/// and the token is non-empty. No verification happens here.
pub fn auth_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token.to_string())
    } else {
        None
    }
}
