use serde::{Deserialize, Serialize};

// A point-in-time market price snapshot. Never persisted; fetched fresh on
// every request. Camel-cased field names match what the frontend expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub ticker: String,
    #[serde(rename = "currentPrice")]
    pub current_price: f64,
    #[serde(rename = "previousClose")]
    pub previous_close: f64,
    pub change: f64,
    #[serde(rename = "changePercent")]
    pub change_percent: f64,
    pub currency: String,
    pub timestamp: String,
}

// One ticker that could not be quoted, with a user-facing reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteFailure {
    pub ticker: String,
    pub error: String,
}

/// Outcome of a batch fetch. Every requested ticker lands in exactly one of
/// the two lists; a bad ticker never fails the batch as a whole.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteBatch {
    pub prices: Vec<Quote>,
    pub errors: Vec<QuoteFailure>,
}
