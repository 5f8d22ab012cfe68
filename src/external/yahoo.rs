use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use crate::external::quote_provider::{QuoteProvider, QuoteProviderError};
use crate::models::Quote;
use crate::utils::round2;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

// Yahoo blocks requests without a browser-looking User-Agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub struct YahooQuoteProvider {
    client: reqwest::Client,
}

impl YahooQuoteProvider {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }
}

impl Default for YahooQuoteProvider {
    fn default() -> Self {
        Self::new()
    }
}

// Minimal response structs (only what we need)
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    meta: YahooMeta,
}

#[derive(Debug, Deserialize)]
struct YahooMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "previousClose")]
    previous_close: Option<f64>,
    currency: Option<String>,
}

/// Builds the quote from the chart metadata. Rounding to 2 decimals happens
/// here, at the source, so downstream totals match what the frontend shows.
fn quote_from_meta(ticker: &str, meta: YahooMeta) -> Result<Quote, QuoteProviderError> {
    let current_price = meta
        .regular_market_price
        .ok_or_else(|| QuoteProviderError::BadResponse("missing regularMarketPrice".into()))?;
    let previous_close = meta
        .previous_close
        .ok_or_else(|| QuoteProviderError::BadResponse("missing previousClose".into()))?;

    let change = current_price - previous_close;
    let change_percent = if previous_close != 0.0 {
        (change / previous_close) * 100.0
    } else {
        0.0
    };

    Ok(Quote {
        ticker: ticker.to_uppercase(),
        current_price: round2(current_price),
        previous_close: round2(previous_close),
        change: round2(change),
        change_percent: round2(change_percent),
        currency: meta.currency.unwrap_or_else(|| "USD".to_string()),
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[async_trait]
impl QuoteProvider for YahooQuoteProvider {
    async fn fetch_quote(&self, ticker: &str) -> Result<Quote, QuoteProviderError> {
        let url = format!("{CHART_URL}/{ticker}");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| QuoteProviderError::Network(e.to_string()))?;

        match resp.status() {
            reqwest::StatusCode::NOT_FOUND => {
                return Err(QuoteProviderError::NotFound(ticker.to_uppercase()))
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => {
                return Err(QuoteProviderError::RateLimited)
            }
            _ => {}
        }

        let body = resp
            .json::<YahooChartResponse>()
            .await
            .map_err(|e| QuoteProviderError::Parse(e.to_string()))?;

        let result = body
            .chart
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
            .ok_or_else(|| QuoteProviderError::BadResponse("missing chart result".into()))?;

        quote_from_meta(ticker, result.meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(price: Option<f64>, close: Option<f64>, currency: Option<&str>) -> YahooMeta {
        YahooMeta {
            regular_market_price: price,
            previous_close: close,
            currency: currency.map(str::to_string),
        }
    }

    #[test]
    fn builds_rounded_quote() {
        let q = quote_from_meta("aapl", meta(Some(150.1234), Some(148.5678), Some("USD"))).unwrap();
        assert_eq!(q.ticker, "AAPL");
        assert_eq!(q.current_price, 150.12);
        assert_eq!(q.previous_close, 148.57);
        assert_eq!(q.change, 1.56);
        assert_eq!(q.change_percent, 1.05);
    }

    #[test]
    fn currency_defaults_to_usd() {
        let q = quote_from_meta("MSFT", meta(Some(100.0), Some(100.0), None)).unwrap();
        assert_eq!(q.currency, "USD");
        assert_eq!(q.change, 0.0);
    }

    #[test]
    fn zero_previous_close_does_not_divide_by_zero() {
        let q = quote_from_meta("X", meta(Some(5.0), Some(0.0), None)).unwrap();
        assert_eq!(q.change_percent, 0.0);
    }

    #[test]
    fn missing_price_is_a_bad_response() {
        let err = quote_from_meta("AAPL", meta(None, Some(148.0), None)).unwrap_err();
        assert!(matches!(err, QuoteProviderError::BadResponse(_)));
    }

    #[test]
    fn parses_chart_payload() {
        let raw = serde_json::json!({
            "chart": {
                "result": [{
                    "meta": {
                        "regularMarketPrice": 150.0,
                        "previousClose": 148.0,
                        "currency": "USD"
                    }
                }]
            }
        });
        let body: YahooChartResponse = serde_json::from_value(raw).unwrap();
        let result = body.chart.result.unwrap().remove(0);
        assert_eq!(result.meta.regular_market_price, Some(150.0));
    }
}
