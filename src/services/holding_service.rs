use crate::errors::AppError;
use crate::external::quote_provider::QuoteProvider;
use crate::models::{Holding, HoldingInput, QuoteBatch, ValuedPortfolio};
use crate::services::{quote_service, valuation_service};
use crate::store::HoldingsStore;

pub async fn list_basic(store: &dyn HoldingsStore) -> Result<Vec<Holding>, AppError> {
    Ok(store.list().await?)
}

/// Loads the holdings, fetches a live quote per distinct ticker and merges
/// the two. Tickers that fail to quote are reported alongside the result;
/// their positions are valued at 0.
pub async fn list_valued(
    store: &dyn HoldingsStore,
    provider: &dyn QuoteProvider,
) -> Result<ValuedPortfolio, AppError> {
    let holdings = store.list().await?;

    let mut tickers: Vec<String> = Vec::new();
    for holding in &holdings {
        if !holding.ticker.is_empty() && !tickers.contains(&holding.ticker) {
            tickers.push(holding.ticker.clone());
        }
    }

    // Chunked so a large portfolio stays within the aggregator's batch cap.
    let mut batch = QuoteBatch::default();
    for chunk in tickers.chunks(quote_service::MAX_BATCH_TICKERS) {
        let part = quote_service::fetch_batch(provider, chunk).await?;
        batch.prices.extend(part.prices);
        batch.errors.extend(part.errors);
    }

    let (portfolio, summary) = valuation_service::value_portfolio(&holdings, &batch.prices);
    Ok(ValuedPortfolio {
        portfolio,
        summary,
        errors: batch.errors,
    })
}

pub async fn create(
    store: &dyn HoldingsStore,
    input: HoldingInput,
) -> Result<Holding, AppError> {
    let problems = input.validate();
    if !problems.is_empty() {
        return Err(AppError::Validation(problems));
    }
    Ok(store.create(&input.normalized()).await?)
}

pub async fn update(
    store: &dyn HoldingsStore,
    id: &str,
    input: HoldingInput,
) -> Result<Holding, AppError> {
    let problems = input.validate();
    if !problems.is_empty() {
        return Err(AppError::Validation(problems));
    }
    Ok(store.update(id, &input.normalized()).await?)
}

pub async fn delete(store: &dyn HoldingsStore, id: &str) -> Result<(), AppError> {
    Ok(store.soft_delete(id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::quote_provider::QuoteProviderError;
    use crate::models::Quote;
    use crate::store::StoreError;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // In-memory stand-in for the Notion adapter.
    struct MemoryStore {
        rows: Mutex<Vec<Holding>>,
        next_id: AtomicUsize,
    }

    impl MemoryStore {
        fn new() -> Self {
            Self {
                rows: Mutex::new(Vec::new()),
                next_id: AtomicUsize::new(1),
            }
        }
    }

    #[async_trait]
    impl HoldingsStore for MemoryStore {
        async fn list(&self) -> Result<Vec<Holding>, StoreError> {
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn create(&self, input: &HoldingInput) -> Result<Holding, StoreError> {
            let now = Utc::now().to_rfc3339();
            let holding = Holding {
                id: format!("page-{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
                ticker: input.ticker.clone(),
                name: input.name.clone(),
                shares: input.shares,
                buy_price: input.buy_price,
                created_at: now.clone(),
                updated_at: now,
            };
            self.rows.lock().unwrap().push(holding.clone());
            Ok(holding)
        }

        async fn update(&self, id: &str, input: &HoldingInput) -> Result<Holding, StoreError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .iter_mut()
                .find(|h| h.id == id)
                .ok_or_else(|| StoreError::RecordNotFound(id.to_string()))?;
            row.ticker = input.ticker.clone();
            row.name = input.name.clone();
            row.shares = input.shares;
            row.buy_price = input.buy_price;
            row.updated_at = Utc::now().to_rfc3339();
            Ok(row.clone())
        }

        async fn soft_delete(&self, id: &str) -> Result<(), StoreError> {
            let mut rows = self.rows.lock().unwrap();
            if !rows.iter().any(|h| h.id == id) {
                return Err(StoreError::RecordNotFound(id.to_string()));
            }
            rows.retain(|h| h.id != id);
            Ok(())
        }
    }

    struct FixedProvider {
        price: f64,
    }

    #[async_trait]
    impl QuoteProvider for FixedProvider {
        async fn fetch_quote(&self, ticker: &str) -> Result<Quote, QuoteProviderError> {
            if ticker.starts_with("BAD") {
                return Err(QuoteProviderError::NotFound(ticker.to_string()));
            }
            Ok(Quote {
                ticker: ticker.to_string(),
                current_price: self.price,
                previous_close: self.price,
                change: 0.0,
                change_percent: 0.0,
                currency: "USD".to_string(),
                timestamp: Utc::now().to_rfc3339(),
            })
        }
    }

    fn input(ticker: &str) -> HoldingInput {
        HoldingInput {
            ticker: ticker.to_string(),
            name: "Test Co".to_string(),
            shares: 10.0,
            buy_price: 100.0,
        }
    }

    #[tokio::test]
    async fn create_normalizes_ticker_before_storing() {
        let store = MemoryStore::new();
        let created = create(&store, input(" aapl ")).await.unwrap();
        assert_eq!(created.ticker, "AAPL");
        assert!(!created.id.is_empty());
        assert!(!created.created_at.is_empty());
    }

    #[tokio::test]
    async fn create_rejects_invalid_input_before_the_store() {
        let store = MemoryStore::new();
        let err = create(
            &store,
            HoldingInput {
                ticker: "".into(),
                name: "".into(),
                shares: -1.0,
                buy_price: 0.0,
            },
        )
        .await
        .unwrap_err();

        match err {
            AppError::Validation(details) => assert_eq!(details.len(), 4),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(store.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_is_idempotent_without_mutation() {
        let store = MemoryStore::new();
        create(&store, input("AAPL")).await.unwrap();
        create(&store, input("MSFT")).await.unwrap();

        let mut first: Vec<String> = list_basic(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|h| h.id)
            .collect();
        let mut second: Vec<String> = list_basic(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|h| h.id)
            .collect();
        first.sort();
        second.sort();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn soft_deleted_holdings_disappear_from_list() {
        let store = MemoryStore::new();
        let created = create(&store, input("AAPL")).await.unwrap();
        delete(&store, &created.id).await.unwrap();

        let listed = list_basic(&store).await.unwrap();
        assert!(listed.iter().all(|h| h.id != created.id));
    }

    #[tokio::test]
    async fn valued_listing_merges_quotes_and_reports_failures() {
        let store = MemoryStore::new();
        create(&store, input("AAPL")).await.unwrap();
        create(&store, input("BADZZZZ")).await.unwrap();

        let provider = FixedProvider { price: 150.0 };
        let valued = list_valued(&store, &provider).await.unwrap();

        assert_eq!(valued.portfolio.len(), 2);
        assert_eq!(valued.errors.len(), 1);
        assert_eq!(valued.errors[0].ticker, "BADZZZZ");

        let aapl = valued
            .portfolio
            .iter()
            .find(|p| p.ticker == "AAPL")
            .unwrap();
        assert_eq!(aapl.current_value, 1500.0);
        assert_eq!(aapl.profit, 500.0);

        let bad = valued
            .portfolio
            .iter()
            .find(|p| p.ticker == "BADZZZZ")
            .unwrap();
        assert_eq!(bad.current_value, 0.0);
    }

    #[tokio::test]
    async fn valued_listing_handles_more_than_twenty_distinct_tickers() {
        let store = MemoryStore::new();
        for i in 0..25 {
            create(&store, input(&format!("T{i}"))).await.unwrap();
        }

        let provider = FixedProvider { price: 10.0 };
        let valued = list_valued(&store, &provider).await.unwrap();
        assert_eq!(valued.portfolio.len(), 25);
        assert!(valued.errors.is_empty());
        assert_eq!(valued.summary.total_value, 2500.0);
    }

    #[tokio::test]
    async fn update_of_missing_holding_surfaces_record_not_found() {
        let store = MemoryStore::new();
        let err = update(&store, "nope", input("AAPL")).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Store(StoreError::RecordNotFound(id)) if id == "nope"
        ));
    }
}
