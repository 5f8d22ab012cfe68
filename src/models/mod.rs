mod holding;
mod quote;
mod valuation;

pub use holding::{Holding, HoldingInput};
pub use quote::{Quote, QuoteBatch, QuoteFailure};
pub use valuation::{PortfolioSummary, ValuedPortfolio, ValuedPosition};
