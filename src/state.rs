use std::sync::Arc;
use std::time::Instant;

use crate::external::quote_provider::QuoteProvider;
use crate::store::HoldingsStore;

// Clients are constructed once in main and injected here; nothing in the
// app reaches for a global.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HoldingsStore>,
    pub quotes: Arc<dyn QuoteProvider>,
    pub started_at: Instant,
}
