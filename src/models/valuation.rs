use serde::{Deserialize, Serialize};

use crate::models::QuoteFailure;

// A holding merged with its live quote. When no quote is available the
// price and value are 0 and the position shows the full cost as a loss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuedPosition {
    pub id: String,
    pub ticker: String,
    pub name: String,
    pub shares: f64,
    pub buy_price: f64,
    pub created_at: String,
    pub updated_at: String,
    #[serde(rename = "currentPrice")]
    pub current_price: f64,
    #[serde(rename = "currentValue")]
    pub current_value: f64,
    pub profit: f64,
    #[serde(rename = "profitPercent")]
    pub profit_percent: f64,
}

// Aggregate totals across all positions, recomputed on every request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    #[serde(rename = "totalValue")]
    pub total_value: f64,
    #[serde(rename = "totalCost")]
    pub total_cost: f64,
    #[serde(rename = "totalProfit")]
    pub total_profit: f64,
    #[serde(rename = "totalProfitPercent")]
    pub total_profit_percent: f64,
}

/// Response body for the valuated portfolio listing. `errors` carries the
/// tickers that could not be quoted; their positions are still included
/// with a value of 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuedPortfolio {
    pub portfolio: Vec<ValuedPosition>,
    pub summary: PortfolioSummary,
    pub errors: Vec<QuoteFailure>,
}
