//! CriticReviewStore implementation for PgStorage.

use async_trait::async_trait;
use shelfscore_core::{CriticReview, NewCriticReview};
use sqlx::{Connection, PgConnection};

use super::{row_to_review, PgStorage, REVIEW_COLUMNS};
use crate::error::StorageError;
use crate::sql::REVIEW_ORDER_BY;
use crate::traits::CriticReviewStore;
use crate::types::RowFailure;

pub(crate) async fn insert_review_row(
    conn: &mut PgConnection,
    review: &NewCriticReview,
) -> Result<CriticReview, StorageError> {
    let sql = format!(
        "INSERT INTO critic_reviews (id, book_id, isbn, quote, critic_name, publication,
             review_url, rating, review_date)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING {REVIEW_COLUMNS}"
    );
    let row = sqlx::query(&sql)
        .bind(&review.id)
        .bind(&review.book_id)
        .bind(review.isbn.as_str())
        .bind(&review.quote)
        .bind(&review.critic_name)
        .bind(&review.publication)
        .bind(&review.review_url)
        .bind(review.rating)
        .bind(review.review_date)
        .fetch_one(&mut *conn)
        .await?;
    row_to_review(&row)
}

#[async_trait]
impl CriticReviewStore for PgStorage {
    async fn insert_review(&self, review: &NewCriticReview) -> Result<CriticReview, StorageError> {
        let mut conn = self.pool.acquire().await?;
        insert_review_row(&mut conn, review).await
    }

    async fn get_reviews_for_book(
        &self,
        book_id: &str,
    ) -> Result<Vec<CriticReview>, StorageError> {
        let sql = format!(
            "SELECT {REVIEW_COLUMNS} FROM critic_reviews WHERE book_id = $1
             ORDER BY {REVIEW_ORDER_BY}"
        );
        let rows = sqlx::query(&sql).bind(book_id).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_review).collect()
    }

    async fn delete_all_reviews(&self) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM critic_reviews").execute(&self.pool).await?;
        tracing::debug!(deleted = result.rows_affected(), "Cleared critic_reviews table");
        Ok(result.rows_affected())
    }

    async fn replace_reviews(
        &self,
        reviews: &[NewCriticReview],
    ) -> Result<Vec<RowFailure>, StorageError> {
        let mut tx = self.pool.begin().await?;
        let deleted = sqlx::query("DELETE FROM critic_reviews").execute(&mut *tx).await?;
        tracing::debug!(deleted = deleted.rows_affected(), "Cleared critic_reviews table");

        let mut failures = Vec::new();
        for (index, review) in reviews.iter().enumerate() {
            let mut sp = tx.begin().await?;
            match insert_review_row(&mut sp, review).await {
                Ok(_) => sp.commit().await?,
                Err(error) => {
                    sp.rollback().await?;
                    failures.push(RowFailure { index, error });
                },
            }
        }
        tx.commit().await?;
        Ok(failures)
    }
}
