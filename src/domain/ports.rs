use crate::domain::model::HistoryEntry;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Append-only log of generated excuses.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, entry: &HistoryEntry) -> Result<()>;
    /// Entries oldest-first.
    async fn load(&self) -> Result<Vec<HistoryEntry>>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}
