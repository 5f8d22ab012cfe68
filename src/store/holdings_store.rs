use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Holding, HoldingInput};

// User-facing causes for store failures. The adapter is the only component
// that inspects Notion's error shapes; everything above sees this enum.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Notion authentication failed, check the integration token")]
    Unauthorized,

    #[error("Notion database not found, check the database id")]
    MissingTarget,

    #[error("holding {0} not found")]
    RecordNotFound(String),

    #[error("Notion rejected the payload: {0}")]
    InvalidPayload(String),

    #[error("Notion request failed: {0}")]
    Transport(String),
}

/// The holdings database. Notion is authoritative: it assigns ids, and the
/// adapter stamps timestamps with its own clock, never a client-supplied one.
/// Deleted records are archived, not erased, and never show up in `list`.
#[async_trait]
pub trait HoldingsStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Holding>, StoreError>;
    async fn create(&self, input: &HoldingInput) -> Result<Holding, StoreError>;
    async fn update(&self, id: &str, input: &HoldingInput) -> Result<Holding, StoreError>;
    async fn soft_delete(&self, id: &str) -> Result<(), StoreError>;
}
