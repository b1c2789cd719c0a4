use rusqlite::params;

use super::{get_conn, Storage};
use crate::error::StorageError;
use crate::types::CatalogStats;

impl Storage {
    /// Get catalogue statistics.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn get_stats(&self) -> Result<CatalogStats, StorageError> {
        let conn = get_conn(&self.pool)?;
        let book_count: i64 = conn.query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))?;
        let review_count: i64 =
            conn.query_row("SELECT COUNT(*) FROM critic_reviews", [], |row| row.get(0))?;
        let scored_book_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM books WHERE calculated_critic_score IS NOT NULL",
            [],
            |row| row.get(0),
        )?;
        let rated_review_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM critic_reviews WHERE rating IS NOT NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(CatalogStats {
            book_count: book_count as u64,
            review_count: review_count as u64,
            scored_book_count: scored_book_count as u64,
            rated_review_count: rated_review_count as u64,
        })
    }

    /// Count books, optionally restricted to one genre (case-insensitive).
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn count_books(&self, genre: Option<&str>) -> Result<u64, StorageError> {
        let conn = get_conn(&self.pool)?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM books WHERE ?1 IS NULL OR EXISTS (
                SELECT 1 FROM json_each(books.genres) WHERE LOWER(json_each.value) = LOWER(?1))",
            params![genre],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
