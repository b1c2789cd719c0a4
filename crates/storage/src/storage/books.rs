use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use shelfscore_core::{Book, BookQuery, Isbn, NewBook, ScoreSummary};

use super::{format_date, get_conn, row_to_book, Storage, BOOK_COLUMNS};
use crate::error::StorageError;
use crate::sql::book_order_by;
use crate::types::{PaginatedResult, RowFailure};

const GENRE_FILTER: &str = "(?1 IS NULL OR EXISTS (
    SELECT 1 FROM json_each(books.genres) WHERE LOWER(json_each.value) = LOWER(?1)))";

/// Insert a single book row on an open connection or savepoint.
pub(crate) fn insert_book_row(conn: &Connection, book: &NewBook) -> Result<Book, StorageError> {
    let created_at = Utc::now();
    let genres = serde_json::to_string(&book.genres)?;
    conn.execute(
        "INSERT INTO books (id, title, author, isbn, isbn_normalized, genres, published_date,
             page_count, summary, cover_image_url, critic_score, calculated_critic_score,
             critic_review_count, created_at)
         VALUES (?1, ?2, ?3, ?4, ?4, ?5, ?6, ?7, ?8, ?9, ?10, NULL, 0, ?11)",
        params![
            book.id,
            book.title,
            book.author,
            book.isbn.as_ref().map(Isbn::as_str),
            genres,
            format_date(book.published_date),
            book.page_count,
            book.summary,
            book.cover_image_url,
            book.critic_score,
            created_at.to_rfc3339(),
        ],
    )?;
    Ok(Book {
        id: book.id.clone(),
        title: book.title.clone(),
        author: book.author.clone(),
        isbn: book.isbn.as_ref().map(ToString::to_string),
        genres: book.genres.clone(),
        published_date: book.published_date,
        page_count: book.page_count,
        summary: book.summary.clone(),
        cover_image_url: book.cover_image_url.clone(),
        critic_score: book.critic_score,
        calculated_critic_score: None,
        critic_review_count: 0,
        created_at,
    })
}

pub(crate) fn get_book_on(conn: &Connection, id: &str) -> Result<Option<Book>, StorageError> {
    let sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1");
    Ok(conn.query_row(&sql, params![id], row_to_book).optional()?)
}

impl Storage {
    /// Insert one book.
    ///
    /// # Errors
    /// `Duplicate` if the id or ISBN is already stored.
    pub fn insert_book(&self, book: &NewBook) -> Result<Book, StorageError> {
        let conn = get_conn(&self.pool)?;
        insert_book_row(&conn, book)
    }

    /// Get book by id.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn get_book(&self, id: &str) -> Result<Option<Book>, StorageError> {
        let conn = get_conn(&self.pool)?;
        get_book_on(&conn, id)
    }

    /// Get book by normalized ISBN.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn get_book_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>, StorageError> {
        let conn = get_conn(&self.pool)?;
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE isbn_normalized = ?1");
        Ok(conn.query_row(&sql, params![isbn.as_str()], row_to_book).optional()?)
    }

    /// # Errors
    /// Returns error if database query fails.
    pub fn list_book_ids(&self) -> Result<Vec<String>, StorageError> {
        let conn = get_conn(&self.pool)?;
        let mut stmt = conn.prepare("SELECT id FROM books ORDER BY rowid")?;
        let ids = stmt.query_map([], |row| row.get(0))?.collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }

    /// Filtered, sorted page of books.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn query_books(&self, query: &BookQuery) -> Result<PaginatedResult<Book>, StorageError> {
        let conn = get_conn(&self.pool)?;
        let limit = query.capped_limit();
        let genre = query.genre.as_deref();

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM books WHERE {GENRE_FILTER}"),
            params![genre],
            |row| row.get(0),
        )?;

        let sql = format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE {GENRE_FILTER}
             ORDER BY {} LIMIT ?2 OFFSET ?3",
            book_order_by(query.sort)
        );
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map(params![genre, limit as i64, query.offset as i64], row_to_book)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PaginatedResult {
            items,
            total: total as u64,
            offset: query.offset as u64,
            limit: limit as u64,
        })
    }

    /// Persist derived score fields.
    ///
    /// # Errors
    /// `NotFound` if the book does not exist.
    pub fn update_book_score(&self, score: &ScoreSummary) -> Result<(), StorageError> {
        let conn = get_conn(&self.pool)?;
        let updated = conn.execute(
            "UPDATE books SET calculated_critic_score = ?2, critic_review_count = ?3 WHERE id = ?1",
            params![score.book_id, score.calculated_critic_score, score.critic_review_count],
        )?;
        if updated == 0 {
            return Err(StorageError::not_found("book", &score.book_id));
        }
        Ok(())
    }

    /// # Errors
    /// Returns error if database query fails.
    pub fn delete_all_books(&self) -> Result<u64, StorageError> {
        let conn = get_conn(&self.pool)?;
        let deleted = conn.execute("DELETE FROM books", [])?;
        tracing::debug!(deleted, "Cleared books table");
        Ok(deleted as u64)
    }

    /// Clear and refill the books table in one transaction.
    ///
    /// # Errors
    /// Returns error if the clear or the final commit fails; per-record insert
    /// failures are returned as [`RowFailure`]s instead.
    pub fn replace_books(&self, books: &[NewBook]) -> Result<Vec<RowFailure>, StorageError> {
        let mut conn = get_conn(&self.pool)?;
        let mut tx = conn.transaction()?;
        let deleted = tx.execute("DELETE FROM books", [])?;
        tracing::debug!(deleted, "Cleared books table");

        let mut failures = Vec::new();
        for (index, book) in books.iter().enumerate() {
            let sp = tx.savepoint()?;
            match insert_book_row(&sp, book) {
                Ok(_) => sp.commit()?,
                // Dropping the savepoint rolls back just this row.
                Err(error) => failures.push(RowFailure { index, error }),
            }
        }
        tx.commit()?;
        Ok(failures)
    }
}
