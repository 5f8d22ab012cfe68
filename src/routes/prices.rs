use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::errors::{AppError, AppJson};
use crate::models::{Quote, QuoteBatch};
use crate::services::quote_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/batch", post(get_batch_quotes))
        .route("/:ticker", get(get_quote))
}

pub async fn get_quote(
    Path(ticker): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Quote>, AppError> {
    info!("GET /price/{} - Fetching quote", ticker);
    let quote = quote_service::fetch_one(state.quotes.as_ref(), &ticker)
        .await
        .map_err(|e| {
            match &e {
                AppError::RateLimited => warn!("Rate limited fetching quote for {}", ticker),
                _ => error!("Failed to fetch quote for {}: {}", ticker, e),
            }
            e
        })?;
    Ok(Json(quote))
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub tickers: Vec<String>,
}

pub async fn get_batch_quotes(
    State(state): State<AppState>,
    AppJson(request): AppJson<BatchRequest>,
) -> Result<Json<QuoteBatch>, AppError> {
    info!(
        "POST /price/batch - Fetching quotes for {} tickers",
        request.tickers.len()
    );
    let batch = quote_service::fetch_batch(state.quotes.as_ref(), &request.tickers)
        .await
        .map_err(|e| {
            error!("Batch quote fetch rejected: {}", e);
            e
        })?;
    Ok(Json(batch))
}
