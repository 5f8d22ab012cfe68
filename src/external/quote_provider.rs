use async_trait::async_trait;
use thiserror::Error;

use crate::models::Quote;

#[derive(Debug, Error)]
pub enum QuoteProviderError {
    #[error("no instrument found for ticker {0}")]
    NotFound(String),

    #[error("rate limited by market data provider")]
    RateLimited,

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("bad response: {0}")]
    BadResponse(String),
}

/// One outbound call per invocation; no retry, no backoff. The caller
/// decides what a failure means.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch_quote(&self, ticker: &str) -> Result<Quote, QuoteProviderError>;
}
