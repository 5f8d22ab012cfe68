use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime: u64,
    pub environment: EnvStatus,
    pub version: &'static str,
}

// Presence flags only; never the values themselves.
#[derive(Debug, Serialize)]
pub struct EnvStatus {
    pub notion_token: bool,
    pub notion_database_id: bool,
    pub environment: String,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    info!("GET /health - Health check");
    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now().to_rfc3339(),
        uptime: state.started_at.elapsed().as_secs(),
        environment: EnvStatus {
            notion_token: std::env::var("NOTION_TOKEN").is_ok(),
            notion_database_id: std::env::var("NOTION_DATABASE_ID").is_ok(),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        },
        version: env!("CARGO_PKG_VERSION"),
    })
}
