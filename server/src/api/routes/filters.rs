//! Filter translation endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::api::extractors::{QueryPairs, ValidatedJson};
use crate::api::types::{ApiError, ErrorResponse};
use crate::core::constants::MAX_RENDER_PREDICATES;
use crate::filters::{Conjunction, FilterPolicy, Predicate, PredicateList, Rejection, translate_all};

// ============================================================================
// State
// ============================================================================

#[derive(Clone)]
pub struct FiltersApiState {
    pub policy: Arc<FilterPolicy>,
}

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// A query pair dropped because the policy skips invalid filters
#[derive(Debug, Serialize, ToSchema)]
pub struct RejectedFilterDto {
    pub key: String,
    pub value: String,
    pub code: String,
    pub message: String,
}

impl From<Rejection> for RejectedFilterDto {
    fn from(r: Rejection) -> Self {
        Self {
            key: r.key,
            value: r.value,
            code: r.error.code().to_string(),
            message: r.error.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TranslateResponse {
    #[schema(value_type = Vec<Predicate>)]
    pub predicates: PredicateList,
    /// Predicates joined with `and`
    #[serde(rename = "where")]
    pub where_clause: String,
    pub rejected: Vec<RejectedFilterDto>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RenderRequest {
    #[validate(custom(function = "validate_render_predicates"))]
    pub predicates: Vec<Predicate>,
    #[serde(default)]
    pub conjunction: Conjunction,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RenderResponse {
    #[serde(rename = "where")]
    pub where_clause: String,
}

/// Bound the batch size and require a key and operator on each predicate
fn validate_render_predicates<T: AsRef<[Predicate]>>(
    predicates: T,
) -> Result<(), ValidationError> {
    let predicates = predicates.as_ref();
    if predicates.len() as u64 > MAX_RENDER_PREDICATES {
        return Err(ValidationError::new("predicates_too_many").with_message(
            format!(
                "Cannot render more than {} predicates at once",
                MAX_RENDER_PREDICATES
            )
            .into(),
        ));
    }
    if let Some(i) = predicates
        .iter()
        .position(|p| p.key.trim().is_empty() || p.operator.trim().is_empty())
    {
        return Err(ValidationError::new("predicate_incomplete")
            .with_message(format!("Predicate {} must have a Key and a Sign", i).into()));
    }
    Ok(())
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes(policy: FilterPolicy) -> Router<()> {
    let state = FiltersApiState {
        policy: Arc::new(policy),
    };
    Router::new()
        .route("/translate", get(translate_filters))
        .route("/render", post(render_predicates))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// Translate query-string filters into SQL predicates
///
/// Every query pair is a filter, e.g. `?age[>-]=18&name[%]=bob`.
#[utoipa::path(
    get,
    path = "/api/v1/filters/translate",
    tag = "filters",
    responses(
        (status = 200, description = "Translated predicates", body = TranslateResponse),
        (status = 400, description = "Invalid filter", body = ErrorResponse)
    )
)]
pub async fn translate_filters(
    State(state): State<FiltersApiState>,
    QueryPairs(pairs): QueryPairs,
) -> Result<Json<TranslateResponse>, ApiError> {
    let set = translate_all(pairs, &state.policy)?;
    let where_clause = set.predicates.join(Conjunction::And);

    Ok(Json(TranslateResponse {
        predicates: set.predicates,
        where_clause,
        rejected: set.rejected.into_iter().map(Into::into).collect(),
    }))
}

/// Join already-translated predicates into a WHERE fragment
#[utoipa::path(
    post,
    path = "/api/v1/filters/render",
    tag = "filters",
    request_body = RenderRequest,
    responses(
        (status = 200, description = "Rendered WHERE fragment", body = RenderResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn render_predicates(
    ValidatedJson(req): ValidatedJson<RenderRequest>,
) -> Json<RenderResponse> {
    let list = PredicateList::from(req.predicates);
    Json(RenderResponse {
        where_clause: list.join(req.conjunction),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::filters::OnError;

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_translate_in_query_order() {
        let (status, body) = send(
            routes(FilterPolicy::default()),
            get_req("/translate?age%5B%3E-%5D=18&name%5B%25%5D=bob"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["where"], "age >= 18 and name::text like '%bob%'");
        assert_eq!(body["predicates"][0]["Key"], "age");
        assert_eq!(body["predicates"][0]["Sign"], ">=");
        assert_eq!(body["predicates"][1]["Type"], "::text");
        assert_eq!(body["rejected"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_translate_between() {
        let (status, body) = send(
            routes(FilterPolicy::default()),
            get_req("/translate?age%5B!%3A%5D=%5B18%7B%3B%7D30%5D"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["where"], "age not between 18 and 30");
    }

    #[tokio::test]
    async fn test_translate_no_pairs() {
        let (status, body) = send(routes(FilterPolicy::default()), get_req("/translate")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["where"], "");
        assert_eq!(body["predicates"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_translate_rejects_bad_filter() {
        let (status, body) = send(
            routes(FilterPolicy::default()),
            get_req("/translate?age%5B%3A%5D=18"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
        assert_eq!(body["code"], "INVALID_FILTER_FORMAT");
    }

    #[tokio::test]
    async fn test_translate_rejects_unknown_key() {
        let policy = FilterPolicy {
            allowed_keys: Some(vec!["age".to_string()]),
            ..Default::default()
        };
        let (status, body) = send(routes(policy), get_req("/translate?password=x")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_FILTER_KEY");
    }

    #[tokio::test]
    async fn test_translate_skip_mode_reports_rejections() {
        let policy = FilterPolicy {
            on_error: OnError::Skip,
            ..Default::default()
        };
        let (status, body) = send(
            routes(policy),
            get_req("/translate?age%5B%3A%5D=18&name=x&id%5B%3D%5D=1"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["where"], "name::text = 'x'");

        let rejected = body["rejected"].as_array().unwrap();
        assert_eq!(rejected.len(), 2);
        assert_eq!(rejected[0]["key"], "age[:]");
        assert_eq!(rejected[0]["code"], "INVALID_FILTER_FORMAT");
        assert_eq!(rejected[1]["key"], "id[=]");
        assert_eq!(rejected[1]["code"], "UNKNOWN_FILTER_OPERATOR");
    }

    #[tokio::test]
    async fn test_translate_too_many_filters() {
        let policy = FilterPolicy {
            max_filters: 1,
            ..Default::default()
        };
        let (status, body) = send(routes(policy), get_req("/translate?a=1&b=2")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "TOO_MANY_FILTERS");
    }

    #[tokio::test]
    async fn test_render_and_or() {
        let predicates = serde_json::json!([
            {"Key": "age", "Type": "", "Sign": ">", "Value": "18"},
            {"Key": "name", "Type": "::text", "Sign": "=", "Value": "'bob'"}
        ]);

        let (status, body) = send(
            routes(FilterPolicy::default()),
            post_json("/render", serde_json::json!({ "predicates": predicates })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["where"], "age > 18 and name::text = 'bob'");

        let (status, body) = send(
            routes(FilterPolicy::default()),
            post_json(
                "/render",
                serde_json::json!({ "predicates": predicates, "conjunction": "or" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["where"], "age > 18 or name::text = 'bob'");
    }

    #[tokio::test]
    async fn test_render_rejects_incomplete_predicate() {
        let (status, body) = send(
            routes(FilterPolicy::default()),
            post_json(
                "/render",
                serde_json::json!({ "predicates": [{"Key": "age", "Value": "1"}] }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_render_rejects_malformed_json() {
        let request = Request::builder()
            .method("POST")
            .uri("/render")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(routes(FilterPolicy::default()), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "JSON_PARSE_ERROR");
    }
}
