use std::collections::HashMap;

use crate::models::{Holding, PortfolioSummary, Quote, ValuedPosition};
use crate::utils::round2;

/// Merges live quotes into a holdings list and computes per-position and
/// portfolio-level figures. Pure function: no I/O, inputs untouched.
///
/// A holding with no quote values at 0 instead of failing the computation.
/// Totals accumulate the raw figures and round once at the end, so they are
/// not distorted by per-position rounding.
pub fn value_portfolio(
    holdings: &[Holding],
    quotes: &[Quote],
) -> (Vec<ValuedPosition>, PortfolioSummary) {
    // Last write wins on duplicate tickers; not expected, but must not crash.
    let mut price_map: HashMap<&str, f64> = HashMap::new();
    for quote in quotes {
        price_map.insert(quote.ticker.as_str(), quote.current_price);
    }

    let mut total_value = 0.0;
    let mut total_cost = 0.0;
    let mut total_profit = 0.0;

    let positions = holdings
        .iter()
        .map(|holding| {
            let current_price = price_map
                .get(holding.ticker.as_str())
                .copied()
                .unwrap_or(0.0);
            let current_value = current_price * holding.shares;
            let cost = holding.buy_price * holding.shares;
            let profit = current_value - cost;
            let profit_percent = if cost > 0.0 { (profit / cost) * 100.0 } else { 0.0 };

            total_value += current_value;
            total_cost += cost;
            total_profit += profit;

            ValuedPosition {
                id: holding.id.clone(),
                ticker: holding.ticker.clone(),
                name: holding.name.clone(),
                shares: holding.shares,
                buy_price: holding.buy_price,
                created_at: holding.created_at.clone(),
                updated_at: holding.updated_at.clone(),
                current_price,
                current_value: round2(current_value),
                profit: round2(profit),
                profit_percent: round2(profit_percent),
            }
        })
        .collect();

    let summary = PortfolioSummary {
        total_value: round2(total_value),
        total_cost: round2(total_cost),
        total_profit: round2(total_profit),
        total_profit_percent: if total_cost > 0.0 {
            round2((total_profit / total_cost) * 100.0)
        } else {
            0.0
        },
    };

    (positions, summary)
}
