//! ScoreProcedure implementation for PgStorage, backed by the
//! `recompute_critic_score` PL/pgSQL function.

use async_trait::async_trait;
use shelfscore_core::{ScoreSummary, MIN_RATED_REVIEWS_FOR_SCORE};
use sqlx::Row;

use super::PgStorage;
use crate::error::StorageError;
use crate::traits::ScoreProcedure;

#[async_trait]
impl ScoreProcedure for PgStorage {
    async fn recompute_critic_score(&self, book_id: &str) -> Result<ScoreSummary, StorageError> {
        let min_rated = i32::try_from(MIN_RATED_REVIEWS_FOR_SCORE).unwrap_or(i32::MAX);
        let row = sqlx::query(
            "SELECT review_count, rated_count, score FROM recompute_critic_score($1, $2)",
        )
        .bind(book_id)
        .bind(min_rated)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match StorageError::from(e) {
            StorageError::NotFound { .. } => StorageError::not_found("book", book_id),
            other => other,
        })?;

        let summary = ScoreSummary {
            book_id: book_id.to_owned(),
            calculated_critic_score: row.try_get("score")?,
            critic_review_count: u32::try_from(row.try_get::<i32, _>("review_count")?).unwrap_or(0),
            rated_review_count: u32::try_from(row.try_get::<i32, _>("rated_count")?).unwrap_or(0),
        };
        tracing::debug!(
            book_id,
            score = ?summary.calculated_critic_score,
            reviews = summary.critic_review_count,
            "Recomputed critic score in store"
        );
        Ok(summary)
    }
}
