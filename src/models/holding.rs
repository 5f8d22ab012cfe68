use serde::{Deserialize, Serialize};

// A single position as stored in the Notion database. Notion owns the id
// and both timestamps; we never generate them locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub id: String,
    pub ticker: String,
    pub name: String,
    pub shares: f64,
    pub buy_price: f64,
    pub created_at: String,
    pub updated_at: String,
}

// Request body shared by POST /portfolio and PUT /portfolio/:id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingInput {
    pub ticker: String,
    pub name: String,
    pub shares: f64,
    pub buy_price: f64,
}

impl HoldingInput {
    /// Trims text fields and upper-cases the ticker. Tickers are always
    /// stored upper-case so quote lookups match.
    pub fn normalized(&self) -> Self {
        Self {
            ticker: self.ticker.trim().to_uppercase(),
            name: self.name.trim().to_string(),
            shares: self.shares,
            buy_price: self.buy_price,
        }
    }

    /// Collects every validation problem instead of stopping at the first,
    /// so the client can show all of them at once.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.ticker.trim().is_empty() {
            problems.push("ticker symbol is required".to_string());
        }
        if self.name.trim().is_empty() {
            problems.push("name is required".to_string());
        }
        if !(self.shares > 0.0) {
            problems.push("shares must be greater than 0".to_string());
        }
        if !(self.buy_price > 0.0) {
            problems.push("buy_price must be greater than 0".to_string());
        }
        problems
    }
}
