use std::sync::Arc;

use shelfscore_core::{FailureKind, RecordFailure, ScoreSummary};
use shelfscore_storage::{CatalogStore, StorageBackend};

use crate::config::ScoreMode;
use crate::ServiceError;

/// Outcome of recomputing every book's score.
#[derive(Debug, Default)]
pub struct ScoreBatch {
    pub updated: Vec<ScoreSummary>,
    /// One `Aggregation` failure per book that could not be recomputed.
    pub failures: Vec<RecordFailure>,
}

pub struct ScoreService<S = StorageBackend> {
    storage: Arc<S>,
    mode: ScoreMode,
}

impl<S> Clone for ScoreService<S> {
    fn clone(&self) -> Self {
        Self { storage: Arc::clone(&self.storage), mode: self.mode }
    }
}

impl<S: CatalogStore> ScoreService<S> {
    #[must_use]
    pub const fn new(storage: Arc<S>, mode: ScoreMode) -> Self {
        Self { storage, mode }
    }

    pub const fn mode(&self) -> ScoreMode {
        self.mode
    }

    /// Recompute and persist one book's derived score fields.
    pub async fn recompute(&self, book_id: &str) -> Result<ScoreSummary, ServiceError> {
        let summary = match self.mode {
            ScoreMode::Store => self.storage.recompute_critic_score(book_id).await?,
            ScoreMode::Local => {
                if self.storage.get_book(book_id).await?.is_none() {
                    return Err(ServiceError::book_not_found(book_id));
                }
                let reviews = self.storage.get_reviews_for_book(book_id).await?;
                let summary =
                    ScoreSummary::from_ratings(book_id, reviews.iter().map(|r| r.rating));
                self.storage.update_book_score(&summary).await?;
                summary
            },
        };
        tracing::debug!(
            book_id,
            mode = %self.mode,
            score = ?summary.calculated_critic_score,
            reviews = summary.critic_review_count,
            "Critic score recomputed"
        );
        Ok(summary)
    }

    /// Recompute every stored book. A failure for one book is recorded and the
    /// rest still run; only failing to list the books is an error.
    pub async fn recompute_all(&self) -> Result<ScoreBatch, ServiceError> {
        let ids = self.storage.list_book_ids().await?;
        let mut batch = ScoreBatch::default();
        for id in ids {
            match self.recompute(&id).await {
                Ok(summary) => batch.updated.push(summary),
                Err(e) => {
                    tracing::warn!(book_id = %id, error = %e, "Score aggregation failed");
                    batch.failures.push(RecordFailure::new(
                        FailureKind::Aggregation,
                        id,
                        e.to_string(),
                    ));
                },
            }
        }
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "test code")]

    use shelfscore_core::{NewBook, ReviewCandidate};
    use shelfscore_storage::{BookStore, CriticReviewStore};

    use super::*;
    use crate::test_support::{book_seed, create_test_backend, review_seed};

    async fn seeded_book(storage: &StorageBackend, ratings: &[Option<f64>]) -> String {
        let book = NewBook::try_from(book_seed("Educated", "9780399590504")).unwrap();
        let book = storage.insert_book(&book).await.unwrap();
        for (i, rating) in ratings.iter().enumerate() {
            let seed = review_seed("9780399590504", None, &format!("critic-{i}"), *rating);
            let review = ReviewCandidate::try_from(seed).unwrap().attach(&book);
            storage.insert_review(&review).await.unwrap();
        }
        book.id
    }

    #[tokio::test]
    async fn recompute_is_idempotent_in_both_modes() {
        let (storage, _temp_dir) = create_test_backend();
        let ratings = [Some(94.0), Some(92.0), Some(90.0), Some(88.0), Some(91.0)];
        let id = seeded_book(&storage, &ratings).await;

        for mode in [ScoreMode::Local, ScoreMode::Store] {
            let service = ScoreService::new(Arc::clone(&storage), mode);
            let first = service.recompute(&id).await.unwrap();
            let second = service.recompute(&id).await.unwrap();
            assert_eq!(first, second);
            assert_eq!(first.calculated_critic_score, Some(91.0));
            assert_eq!(first.critic_review_count, 5);
        }
    }

    #[tokio::test]
    async fn fewer_than_five_rated_reviews_stay_pending() {
        let (storage, _temp_dir) = create_test_backend();
        let ratings = [Some(82.0), Some(78.0), Some(85.0), None, None];
        let id = seeded_book(&storage, &ratings).await;

        let summary = ScoreService::new(Arc::clone(&storage), ScoreMode::Local)
            .recompute(&id)
            .await
            .unwrap();
        assert!(summary.is_pending());
        assert_eq!(summary.critic_review_count, 5);

        let stored = storage.get_book(&id).await.unwrap().unwrap();
        assert_eq!(stored.calculated_critic_score, None);
        assert_eq!(stored.critic_review_count, 5);
    }

    #[tokio::test]
    async fn unknown_book_is_not_found() {
        let (storage, _temp_dir) = create_test_backend();
        for mode in [ScoreMode::Local, ScoreMode::Store] {
            let err = ScoreService::new(Arc::clone(&storage), mode)
                .recompute("no-such-book")
                .await
                .unwrap_err();
            assert!(err.is_not_found(), "{mode}: {err:?}");
        }
    }

    #[tokio::test]
    async fn recompute_all_covers_every_book() {
        let (storage, _temp_dir) = create_test_backend();
        seeded_book(&storage, &[Some(50.0)]).await;
        let other = NewBook::try_from(book_seed("Babel", "9780063021426")).unwrap();
        storage.insert_book(&other).await.unwrap();

        let batch = ScoreService::new(Arc::clone(&storage), ScoreMode::Local)
            .recompute_all()
            .await
            .unwrap();
        assert_eq!(batch.updated.len(), 2);
        assert!(batch.failures.is_empty());
    }
}
