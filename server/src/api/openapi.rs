//! OpenAPI specification

use axum::http::header;
use axum::response::{IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{filters, health};
use crate::api::types::ErrorResponse;
use crate::filters::{Conjunction, Predicate};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "QFilter API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Query-string filters to SQL predicates"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "filters", description = "Filter translation")
    ),
    paths(
        health::health,
        filters::translate_filters,
        filters::render_predicates,
    ),
    components(schemas(
        ErrorResponse,
        health::HealthResponse,
        Predicate,
        Conjunction,
        filters::TranslateResponse,
        filters::RejectedFilterDto,
        filters::RenderRequest,
        filters::RenderResponse,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}
