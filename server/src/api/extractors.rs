//! Request extractors
//!
//! Rejections render through [`ApiError`] so parse and validation failures
//! share the error body of every other endpoint.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::types::ApiError;

/// Why a request could not be extracted
#[derive(Debug)]
pub enum ExtractRejection {
    Query(QueryRejection),
    Json(JsonRejection),
    Validation(ValidationErrors),
}

impl From<ExtractRejection> for ApiError {
    fn from(rejection: ExtractRejection) -> Self {
        match rejection {
            ExtractRejection::Query(r) => ApiError::bad_request("QUERY_PARSE_ERROR", r.body_text()),
            ExtractRejection::Json(r) => ApiError::bad_request("JSON_PARSE_ERROR", r.body_text()),
            ExtractRejection::Validation(errors) => {
                ApiError::bad_request("VALIDATION_ERROR", describe(&errors))
            }
        }
    }
}

impl IntoResponse for ExtractRejection {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

/// `field: message` for each failed check, ordered by field name
fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => format!("{}: {}", field, message),
                None => format!("{}: failed {}", field, e.code),
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Raw query pairs in request order.
///
/// Decoding follows `application/x-www-form-urlencoded`, so a literal `+`
/// must be sent as `%2B`. Repeated keys are kept.
#[derive(Debug, Default)]
pub struct QueryPairs(pub Vec<(String, String)>);

impl<S> FromRequestParts<S> for QueryPairs
where
    S: Send + Sync,
{
    type Rejection = ExtractRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map(|Query(pairs)| Self(pairs))
            .map_err(ExtractRejection::Query)
    }
}

/// JSON body run through `validator` before the handler sees it
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ExtractRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ExtractRejection::Json)?;
        value.validate().map_err(ExtractRejection::Validation)?;
        Ok(Self(value))
    }
}
