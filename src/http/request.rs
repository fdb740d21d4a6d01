//! Request metadata helpers.
//!
//! # Responsibilities
//! - Expose the request ID attached by `SetRequestIdLayer`
//! - Read the `Referer` used as the default redirect target

use axum::http::{header, HeaderMap, HeaderName};

/// Header carrying the per-request UUID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// The request ID, or `"unknown"` when the layer did not run.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// The non-empty `Referer` header, if any.
pub fn referer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}
