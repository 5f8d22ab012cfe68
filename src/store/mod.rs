mod holdings_store;
mod notion;

pub use holdings_store::{HoldingsStore, StoreError};
pub use notion::NotionStore;
