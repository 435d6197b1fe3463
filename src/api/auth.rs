//! Bearer token authentication for the report routes.

use axum::{
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
}

/// Compares two tokens in time independent of where they differ.
fn tokens_match(presented: &[u8], expected: &[u8]) -> bool {
    if presented.len() != expected.len() {
        return false;
    }
    presented
        .iter()
        .zip(expected)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

/// Rejects requests that do not carry the configured shared secret.
pub async fn require_bearer_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        warn!(path = %request.uri().path(), "Rejected request without bearer token");
        return ApiErrorResponse::new(StatusCode::UNAUTHORIZED, ApiError::missing_token())
            .into_response();
    };

    let expected = state.config().server().api_token.as_bytes();
    if expected.is_empty() || !tokens_match(token.as_bytes(), expected) {
        warn!(path = %request.uri().path(), "Rejected request with invalid bearer token");
        return ApiErrorResponse::new(StatusCode::UNAUTHORIZED, ApiError::invalid_token())
            .into_response();
    }

    next.run(request).await
}
