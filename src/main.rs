use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::http::HeaderValue;
use tokio::net::TcpListener;

use notionfolio_backend::external::yahoo::YahooQuoteProvider;
use notionfolio_backend::state::AppState;
use notionfolio_backend::store::NotionStore;
use notionfolio_backend::{app, logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    logging::init_logging(logging::LoggingConfig::from_env())?;

    // Fail fast: no point serving without store credentials.
    let store = NotionStore::from_env().map_err(|e| {
        tracing::error!("❌ Missing Notion configuration: {}", e);
        e
    })?;

    let cors_origin = std::env::var("CORS_ORIGIN")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);

    let state = AppState {
        store: Arc::new(store),
        quotes: Arc::new(YahooQuoteProvider::new()),
        started_at: Instant::now(),
    };
    let app = app::create_app(state, cors_origin.parse::<HeaderValue>()?);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Notionfolio backend running at http://{}/", addr);
    tracing::info!(
        "🌍 Environment: {}",
        std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
    );
    tracing::info!("🔗 CORS Origin: {}", cors_origin);
    axum::serve(listener, app).await?;

    Ok(())
}
