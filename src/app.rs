use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::{BoxError, Json, Router};
use serde_json::json;
use tower::buffer::BufferLayer;
use tower::limit::RateLimitLayer;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::routes::{health, portfolio, prices};
use crate::state::AppState;

// Inbound throttle: 100 requests per 15 minutes. Excess requests queue in
// the buffer until the window refills rather than erroring out.
const RATE_LIMIT_REQUESTS: u64 = 100;
const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(15 * 60);

const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

pub fn create_app(state: AppState, cors_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/portfolio", portfolio::router())
        .nest("/price", prices::router())
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(BufferLayer::new(1024))
                .layer(RateLimitLayer::new(RATE_LIMIT_REQUESTS, RATE_LIMIT_WINDOW)),
        )
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}

// Buffer overflow or a dropped worker; the rate limiter itself delays
// instead of failing.
async fn handle_middleware_error(err: BoxError) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "error": format!("service overloaded: {err}") })),
    )
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "endpoint not found" })),
    )
}
