//! HTTP middleware (404 handler)

use axum::extract::Request;
use axum::response::IntoResponse;

use super::types::ApiError;

/// Handle 404 Not Found with logging
pub async fn handle_404(req: Request) -> impl IntoResponse {
    tracing::debug!(method = %req.method(), uri = %req.uri(), "[404] No route");
    ApiError::not_found(
        "NOT_FOUND",
        format!("No route for {} {}", req.method(), req.uri().path()),
    )
}
