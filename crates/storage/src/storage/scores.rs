use rusqlite::{params, OptionalExtension};
use shelfscore_core::{ScoreSummary, MIN_RATED_REVIEWS_FOR_SCORE};

use super::{get_conn, to_u32, Storage};
use crate::error::StorageError;

/// Recount a book's reviews and re-derive its score in one statement.
/// `COUNT(rating)` and `AVG(rating)` skip NULL ratings.
const RECOMPUTE_SQL: &str = "
UPDATE books SET
    critic_review_count = (
        SELECT COUNT(*) FROM critic_reviews r WHERE r.book_id = books.id),
    calculated_critic_score = (
        SELECT CASE WHEN COUNT(r.rating) >= ?2 THEN AVG(r.rating) END
        FROM critic_reviews r WHERE r.book_id = books.id)
WHERE id = ?1";

const READ_BACK_SQL: &str = "
SELECT b.calculated_critic_score, b.critic_review_count,
       (SELECT COUNT(r.rating) FROM critic_reviews r WHERE r.book_id = b.id)
FROM books b WHERE b.id = ?1";

impl Storage {
    /// Database-side equivalent of [`ScoreSummary::from_ratings`].
    ///
    /// # Errors
    /// `NotFound` if the book does not exist.
    pub fn recompute_critic_score(&self, book_id: &str) -> Result<ScoreSummary, StorageError> {
        let mut conn = get_conn(&self.pool)?;
        let tx = conn.transaction()?;
        let updated =
            tx.execute(RECOMPUTE_SQL, params![book_id, MIN_RATED_REVIEWS_FOR_SCORE as i64])?;
        if updated == 0 {
            return Err(StorageError::not_found("book", book_id));
        }
        let summary = tx
            .query_row(READ_BACK_SQL, params![book_id], |row| {
                Ok(ScoreSummary {
                    book_id: book_id.to_owned(),
                    calculated_critic_score: row.get(0)?,
                    critic_review_count: to_u32(1, row.get(1)?)?,
                    rated_review_count: to_u32(2, row.get(2)?)?,
                })
            })
            .optional()?
            .ok_or_else(|| StorageError::not_found("book", book_id))?;
        tx.commit()?;
        tracing::debug!(
            book_id,
            score = ?summary.calculated_critic_score,
            reviews = summary.critic_review_count,
            "Recomputed critic score in store"
        );
        Ok(summary)
    }
}
