//! Shared API types
//!
//! Error responses share one JSON shape: `{"error", "code", "message"}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::filters::FilterError;

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error category (`bad_request`, `not_found`, ...)
    pub error: String,
    /// Machine-readable code such as `INVALID_FILTER_FORMAT`
    pub code: String,
    pub message: String,
}

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(e: FilterError) -> Self {
        tracing::debug!(error = %e, "Filter rejected");
        Self::bad_request(e.code(), e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
        };
        (
            status,
            Json(ErrorResponse {
                error: error_type.to_string(),
                code,
                message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_filter_error_maps_to_bad_request() {
        let error = FilterError::wrong_format("between").for_entry("age[:]", "18");
        let response = ApiError::from(error).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "bad_request");
        assert_eq!(body["code"], "INVALID_FILTER_FORMAT");
        assert_eq!(
            body["message"],
            r#"filter "age[:]": wrong value format for "between" operation"#
        );
    }

    #[tokio::test]
    async fn test_not_found_shape() {
        let response = ApiError::not_found("NOT_FOUND", "no route").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "not_found");
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["message"], "no route");
    }
}
