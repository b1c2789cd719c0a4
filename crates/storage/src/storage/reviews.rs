use chrono::Utc;
use rusqlite::{params, Connection};
use shelfscore_core::{CriticReview, NewCriticReview};

use super::{format_date, get_conn, row_to_review, Storage, REVIEW_COLUMNS};
use crate::error::StorageError;
use crate::sql::REVIEW_ORDER_BY;
use crate::types::RowFailure;

pub(crate) fn insert_review_row(
    conn: &Connection,
    review: &NewCriticReview,
) -> Result<CriticReview, StorageError> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO critic_reviews (id, book_id, isbn, quote, critic_name, publication,
             review_url, rating, review_date, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
        params![
            review.id,
            review.book_id,
            review.isbn.as_str(),
            review.quote,
            review.critic_name,
            review.publication,
            review.review_url,
            review.rating,
            format_date(review.review_date),
            now.to_rfc3339(),
        ],
    )?;
    Ok(CriticReview {
        id: review.id.clone(),
        book_id: review.book_id.clone(),
        isbn: review.isbn.to_string(),
        quote: review.quote.clone(),
        critic_name: review.critic_name.clone(),
        publication: review.publication.clone(),
        review_url: review.review_url.clone(),
        rating: review.rating,
        review_date: review.review_date,
        created_at: now,
        updated_at: now,
    })
}

impl Storage {
    /// Insert one review.
    ///
    /// # Errors
    /// Fails on a duplicate id or when the owning book is missing.
    pub fn insert_review(&self, review: &NewCriticReview) -> Result<CriticReview, StorageError> {
        let conn = get_conn(&self.pool)?;
        insert_review_row(&conn, review)
    }

    /// # Errors
    /// Returns error if database query fails.
    pub fn get_reviews_for_book(&self, book_id: &str) -> Result<Vec<CriticReview>, StorageError> {
        let conn = get_conn(&self.pool)?;
        let sql = format!(
            "SELECT {REVIEW_COLUMNS} FROM critic_reviews WHERE book_id = ?1
             ORDER BY {REVIEW_ORDER_BY}"
        );
        let mut stmt = conn.prepare(&sql)?;
        let reviews =
            stmt.query_map(params![book_id], row_to_review)?.collect::<Result<Vec<_>, _>>()?;
        Ok(reviews)
    }

    /// # Errors
    /// Returns error if database query fails.
    pub fn delete_all_reviews(&self) -> Result<u64, StorageError> {
        let conn = get_conn(&self.pool)?;
        let deleted = conn.execute("DELETE FROM critic_reviews", [])?;
        tracing::debug!(deleted, "Cleared critic_reviews table");
        Ok(deleted as u64)
    }

    /// Clear and refill the reviews table in one transaction.
    ///
    /// # Errors
    /// Returns error if the clear or the final commit fails.
    pub fn replace_reviews(
        &self,
        reviews: &[NewCriticReview],
    ) -> Result<Vec<RowFailure>, StorageError> {
        let mut conn = get_conn(&self.pool)?;
        let mut tx = conn.transaction()?;
        let deleted = tx.execute("DELETE FROM critic_reviews", [])?;
        tracing::debug!(deleted, "Cleared critic_reviews table");

        let mut failures = Vec::new();
        for (index, review) in reviews.iter().enumerate() {
            let sp = tx.savepoint()?;
            match insert_review_row(&sp, review) {
                Ok(_) => sp.commit()?,
                Err(error) => failures.push(RowFailure { index, error }),
            }
        }
        tx.commit()?;
        Ok(failures)
    }
}
