use axum::extract::{Path, State};
use axum::routing::{delete, get};
use axum::{Json, Router};
use http::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::errors::{AppError, AppJson};
use crate::models::{Holding, HoldingInput, ValuedPortfolio};
use crate::services::holding_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_portfolio).post(add_holding))
        .route("/basic", get(get_portfolio_basic))
        .route("/:id", delete(delete_holding).put(update_holding))
}

pub async fn get_portfolio(
    State(state): State<AppState>,
) -> Result<Json<ValuedPortfolio>, AppError> {
    info!("GET /portfolio - Fetching valuated portfolio");
    let valued = holding_service::list_valued(state.store.as_ref(), state.quotes.as_ref())
        .await
        .map_err(|e| {
            error!("Failed to fetch valuated portfolio: {}", e);
            e
        })?;
    Ok(Json(valued))
}

// Holdings only, no valuation fields. Clients that want totals call
// GET /portfolio instead.
#[derive(Debug, Serialize)]
pub struct BasicPortfolio {
    pub portfolio: Vec<Holding>,
}

pub async fn get_portfolio_basic(
    State(state): State<AppState>,
) -> Result<Json<BasicPortfolio>, AppError> {
    info!("GET /portfolio/basic - Fetching holdings without quotes");
    let portfolio = holding_service::list_basic(state.store.as_ref())
        .await
        .map_err(|e| {
            error!("Failed to fetch holdings: {}", e);
            e
        })?;
    Ok(Json(BasicPortfolio { portfolio }))
}

#[axum::debug_handler]
pub async fn add_holding(
    State(state): State<AppState>,
    AppJson(input): AppJson<HoldingInput>,
) -> Result<(StatusCode, Json<Holding>), AppError> {
    info!("POST /portfolio - Adding holding {}", input.ticker);
    let holding = holding_service::create(state.store.as_ref(), input)
        .await
        .map_err(|e| {
            error!("Failed to add holding: {}", e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(holding)))
}

pub async fn update_holding(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<HoldingInput>,
) -> Result<Json<Holding>, AppError> {
    info!("PUT /portfolio/{} - Updating holding", id);
    let holding = holding_service::update(state.store.as_ref(), &id, input)
        .await
        .map_err(|e| {
            error!("Failed to update holding {}: {}", id, e);
            e
        })?;
    Ok(Json(holding))
}

pub async fn delete_holding(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    info!("DELETE /portfolio/{} - Archiving holding", id);
    holding_service::delete(state.store.as_ref(), &id)
        .await
        .map_err(|e| {
            error!("Failed to archive holding {}: {}", id, e);
            e
        })?;
    Ok(Json(json!({ "message": "holding deleted" })))
}
