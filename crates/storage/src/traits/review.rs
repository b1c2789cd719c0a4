use async_trait::async_trait;
use shelfscore_core::{CriticReview, NewCriticReview};

use crate::error::StorageError;
use crate::types::RowFailure;

/// Critic review table operations.
#[async_trait]
pub trait CriticReviewStore: Send + Sync {
    /// Insert one review. The owning book must exist.
    async fn insert_review(&self, review: &NewCriticReview) -> Result<CriticReview, StorageError>;

    /// Reviews owned by `book_id`, newest review date first (undated last).
    async fn get_reviews_for_book(&self, book_id: &str)
    -> Result<Vec<CriticReview>, StorageError>;

    /// Delete every review. Returns rows deleted.
    async fn delete_all_reviews(&self) -> Result<u64, StorageError>;

    /// Clear the table and insert `reviews` in one transaction, savepoint per record.
    async fn replace_reviews(
        &self,
        reviews: &[NewCriticReview],
    ) -> Result<Vec<RowFailure>, StorageError>;
}
