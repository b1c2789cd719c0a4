//! StatsStore implementation for PgStorage.

use async_trait::async_trait;

use super::PgStorage;
use crate::error::StorageError;
use crate::traits::StatsStore;
use crate::types::CatalogStats;

#[async_trait]
impl StatsStore for PgStorage {
    async fn get_stats(&self) -> Result<CatalogStats, StorageError> {
        let book_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM books").fetch_one(&self.pool).await?;
        let review_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM critic_reviews").fetch_one(&self.pool).await?;
        let scored_book_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM books WHERE calculated_critic_score IS NOT NULL",
        )
        .fetch_one(&self.pool)
        .await?;
        let rated_review_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM critic_reviews WHERE rating IS NOT NULL")
                .fetch_one(&self.pool)
                .await?;
        Ok(CatalogStats {
            book_count: u64::try_from(book_count).unwrap_or(0),
            review_count: u64::try_from(review_count).unwrap_or(0),
            scored_book_count: u64::try_from(scored_book_count).unwrap_or(0),
            rated_review_count: u64::try_from(rated_review_count).unwrap_or(0),
        })
    }

    async fn count_books(&self, genre: Option<&str>) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM books WHERE $1::TEXT IS NULL
                OR EXISTS (SELECT 1 FROM unnest(genres) g WHERE LOWER(g) = LOWER($1))",
        )
        .bind(genre)
        .fetch_one(&self.pool)
        .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}
