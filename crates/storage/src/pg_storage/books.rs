//! BookStore implementation for PgStorage.

use async_trait::async_trait;
use shelfscore_core::{Book, BookQuery, Isbn, NewBook, ScoreSummary};
use sqlx::{Connection, PgConnection};

use super::{row_to_book, usize_to_i64, PgStorage, BOOK_COLUMNS};
use crate::error::StorageError;
use crate::sql::book_order_by;
use crate::traits::BookStore;
use crate::types::{PaginatedResult, RowFailure};

const GENRE_FILTER: &str =
    "($1::TEXT IS NULL OR EXISTS (SELECT 1 FROM unnest(genres) g WHERE LOWER(g) = LOWER($1)))";

pub(crate) async fn insert_book_row(
    conn: &mut PgConnection,
    book: &NewBook,
) -> Result<Book, StorageError> {
    let page_count = book.page_count.map(i32::try_from).transpose().map_err(|e| {
        StorageError::DataCorruption {
            context: format!("page_count of book {}", book.id),
            source: Box::new(e),
        }
    })?;
    let sql = format!(
        "INSERT INTO books (id, title, author, isbn, genres, published_date, page_count,
             summary, cover_image_url, critic_score)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
         RETURNING {BOOK_COLUMNS}"
    );
    let row = sqlx::query(&sql)
        .bind(&book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.isbn.as_ref().map(Isbn::as_str))
        .bind(&book.genres)
        .bind(book.published_date)
        .bind(page_count)
        .bind(&book.summary)
        .bind(&book.cover_image_url)
        .bind(book.critic_score)
        .fetch_one(&mut *conn)
        .await?;
    row_to_book(&row)
}

#[async_trait]
impl BookStore for PgStorage {
    async fn insert_book(&self, book: &NewBook) -> Result<Book, StorageError> {
        let mut conn = self.pool.acquire().await?;
        insert_book_row(&mut conn, book).await
    }

    async fn get_book(&self, id: &str) -> Result<Option<Book>, StorageError> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1");
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(row_to_book).transpose()
    }

    async fn get_book_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>, StorageError> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE isbn = $1");
        let row = sqlx::query(&sql).bind(isbn.as_str()).fetch_optional(&self.pool).await?;
        row.as_ref().map(row_to_book).transpose()
    }

    async fn list_book_ids(&self) -> Result<Vec<String>, StorageError> {
        let ids: Vec<String> = sqlx::query_scalar("SELECT id FROM books ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn query_books(&self, query: &BookQuery) -> Result<PaginatedResult<Book>, StorageError> {
        let limit = query.capped_limit();
        let genre = query.genre.as_deref();

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM books WHERE {GENRE_FILTER}"))
            .bind(genre)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE {GENRE_FILTER}
             ORDER BY {} LIMIT $2 OFFSET $3",
            book_order_by(query.sort)
        );
        let rows = sqlx::query(&sql)
            .bind(genre)
            .bind(usize_to_i64(limit))
            .bind(usize_to_i64(query.offset))
            .fetch_all(&self.pool)
            .await?;
        let items = rows.iter().map(row_to_book).collect::<Result<Vec<_>, _>>()?;

        Ok(PaginatedResult {
            items,
            total: u64::try_from(total).unwrap_or(0),
            offset: query.offset as u64,
            limit: limit as u64,
        })
    }

    async fn update_book_score(&self, score: &ScoreSummary) -> Result<(), StorageError> {
        let review_count = i32::try_from(score.critic_review_count).unwrap_or(i32::MAX);
        let result = sqlx::query(
            "UPDATE books SET calculated_critic_score = $2, critic_review_count = $3 WHERE id = $1",
        )
        .bind(&score.book_id)
        .bind(score.calculated_critic_score)
        .bind(review_count)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("book", &score.book_id));
        }
        Ok(())
    }

    async fn delete_all_books(&self) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM books").execute(&self.pool).await?;
        tracing::debug!(deleted = result.rows_affected(), "Cleared books table");
        Ok(result.rows_affected())
    }

    async fn replace_books(&self, books: &[NewBook]) -> Result<Vec<RowFailure>, StorageError> {
        let mut tx = self.pool.begin().await?;
        let deleted = sqlx::query("DELETE FROM books").execute(&mut *tx).await?;
        tracing::debug!(deleted = deleted.rows_affected(), "Cleared books table");

        let mut failures = Vec::new();
        for (index, book) in books.iter().enumerate() {
            // Nested begin on an open transaction issues a SAVEPOINT.
            let mut sp = tx.begin().await?;
            match insert_book_row(&mut sp, book).await {
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
