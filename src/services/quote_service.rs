use futures::future::join_all;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::external::quote_provider::{QuoteProvider, QuoteProviderError};
use crate::models::{Quote, QuoteBatch, QuoteFailure};

/// Upper bound on tickers per batch call, enforced here before any network
/// call goes out. This is our boundary, not something upstream negotiates.
pub const MAX_BATCH_TICKERS: usize = 20;

pub async fn fetch_one(provider: &dyn QuoteProvider, ticker: &str) -> Result<Quote, AppError> {
    let ticker = ticker.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(AppError::validation("ticker symbol is required"));
    }

    provider.fetch_quote(&ticker).await.map_err(|e| match e {
        QuoteProviderError::NotFound(t) => {
            AppError::NotFound(format!("no instrument found for ticker {t}"))
        }
        QuoteProviderError::RateLimited => AppError::RateLimited,
        other => AppError::Upstream(other.to_string()),
    })
}

/// Fans the batch out to the provider, one concurrent call per ticker, and
/// waits for every call to settle. A failed ticker lands in `errors`; it
/// never cancels or fails the rest of the batch.
pub async fn fetch_batch(
    provider: &dyn QuoteProvider,
    tickers: &[String],
) -> Result<QuoteBatch, AppError> {
    if tickers.is_empty() {
        return Err(AppError::validation("tickers array is required"));
    }
    if tickers.len() > MAX_BATCH_TICKERS {
        return Err(AppError::TooManyTickers);
    }

    let normalized: Vec<String> = tickers
        .iter()
        .map(|t| t.trim().to_uppercase())
        .collect();

    let results = join_all(
        normalized
            .iter()
            .map(|ticker| provider.fetch_quote(ticker)),
    )
    .await;

    // join_all keeps input order, so zipping back against the request list
    // associates each outcome with the ticker that produced it.
    let mut batch = QuoteBatch::default();
    for (ticker, result) in normalized.into_iter().zip(results) {
        match result {
            Ok(quote) => batch.prices.push(quote),
            Err(e) => {
                warn!("Quote fetch failed for {}: {}", ticker, e);
                batch.errors.push(QuoteFailure {
                    ticker,
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        "Fetched quote batch: {} ok, {} failed",
        batch.prices.len(),
        batch.errors.len()
    );
    Ok(batch)
}
