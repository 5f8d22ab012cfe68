use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use axum::Json;
use reqwest::StatusCode;
use serde_json::json;
use thiserror::Error;

use crate::services::quote_service::MAX_BATCH_TICKERS;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<String>),
    #[error("{0}")]
    NotFound(String),
    #[error("Rate limited by market data provider")]
    RateLimited,
    #[error("Batch size exceeded: at most {MAX_BATCH_TICKERS} tickers per request")]
    TooManyTickers,
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("Market data error: {0}")]
    Upstream(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(vec![msg.into()])
    }
}

/// `axum::Json` with the rejection routed through `AppError`, so a missing
/// or malformed body comes back as the same 400 shape as any other
/// validation failure instead of axum's plain-text 422.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(vec![rejection.body_text()])
    }
}

// The only place component failures become HTTP status codes. Everything
// below speaks JSON so the frontend can always read an `error` field.
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Validation failed", "details": details })),
            )
                .into_response(),
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response()
            }
            AppError::RateLimited => {
                let mut headers = HeaderMap::new();
                headers.insert("Retry-After", HeaderValue::from_static("60"));
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    headers,
                    Json(json!({ "error": "Rate limited by market data provider" })),
                )
                    .into_response()
            }
            AppError::TooManyTickers => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": format!("At most {} tickers per batch request", MAX_BATCH_TICKERS)
                })),
            )
                .into_response(),
            // A missing record is the caller's 404; everything else from
            // the store is an upstream failure.
            AppError::Store(err @ StoreError::RecordNotFound(_)) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": err.to_string() })))
                    .into_response()
            }
            AppError::Store(err) => {
                (StatusCode::BAD_GATEWAY, Json(json!({ "error": err.to_string() })))
                    .into_response()
            }
            AppError::Upstream(msg) => {
                (StatusCode::BAD_GATEWAY, Json(json!({ "error": msg }))).into_response()
            }
        }
    }
}
