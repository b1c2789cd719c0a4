use async_trait::async_trait;

use crate::error::StorageError;
use crate::types::CatalogStats;

/// Row counts. Used for status reporting, never for correctness.
#[async_trait]
pub trait StatsStore: Send + Sync {
    async fn get_stats(&self) -> Result<CatalogStats, StorageError>;

    /// Books carrying `genre`, or all books when `None`.
    async fn count_books(&self, genre: Option<&str>) -> Result<u64, StorageError>;
}
