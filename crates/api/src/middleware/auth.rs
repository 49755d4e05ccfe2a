//! Admin authentication middleware.
//!
//! Admin routes take the raw key in the `X-API-Key` header. Only its
//! SHA-256 digest is configured, so the key itself never sits in config.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::app::AppState;

/// Header carrying the admin API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Middleware for admin-only routes.
///
/// Missing key is 401; a key whose digest does not match the configured
/// `security.admin_api_key_hash` is 403. With no hash configured every key
/// is rejected.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let api_key = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|k| !k.is_empty());

    let Some(api_key) = api_key else {
        return unauthorized_response("Invalid or missing API key");
    };

    if !shared::crypto::matches_sha256_hex(api_key, &state.config.security.admin_api_key_hash) {
        tracing::warn!("Rejected admin request with non-matching API key");
        return forbidden_response("Admin access required");
    }

    next.run(req).await
}

/// Helper to create unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

/// Helper to create forbidden response.
fn forbidden_response(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": message
        })),
    )
        .into_response()
}
