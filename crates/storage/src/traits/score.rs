use async_trait::async_trait;
use shelfscore_core::ScoreSummary;

use crate::error::StorageError;

/// Store-side score aggregation.
///
/// Recomputes and persists `calculated_critic_score` / `critic_review_count`
/// for one book entirely inside the database, using the same rule as
/// [`ScoreSummary::from_ratings`].
#[async_trait]
pub trait ScoreProcedure: Send + Sync {
    async fn recompute_critic_score(&self, book_id: &str) -> Result<ScoreSummary, StorageError>;
}
