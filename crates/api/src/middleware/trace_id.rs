//! Request ID helpers for per-request tracing spans.
//!
//! `tower_http`'s request-id layers assign the ID (keeping an incoming
//! `X-Request-ID`, otherwise a UUID v4) and echo it on the response; the
//! span built here records it so every log line of a request carries it.

use axum::{
    body::Body,
    http::{HeaderMap, Request},
};
use tracing::Span;

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Span wrapping one request.
pub fn request_span(req: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        request_id = %request_id(req.headers()),
        method = %req.method(),
        path = %req.uri().path(),
    )
}

/// Reads the request ID from headers, or `unknown`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}
