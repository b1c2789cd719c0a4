//! `SQLite` storage implementation.
//!
//! Methods here are synchronous; the async store traits are implemented on top
//! of them in `sqlite_async.rs` via `spawn_blocking`.

// SQLite uses i64 for counts/limits, Rust uses usize/u32 - conversions are checked or bounded
#![allow(
    clippy::as_conversions,
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "SQLite i64 <-> Rust usize conversions are safe within DB row counts"
)]
#![allow(clippy::absolute_paths, reason = "std paths in error handling are clear")]

mod books;
mod reviews;
mod scores;
mod stats;

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use shelfscore_core::{env_parse_with_default, Book, CriticReview};

use crate::error::StorageError;
use crate::migrations;

/// Type alias for pooled connection
pub(crate) type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Main storage struct wrapping `SQLite` connection pool
#[derive(Clone, Debug)]
pub struct Storage {
    pub(crate) pool: Pool<SqliteConnectionManager>,
}

/// Get a connection from the pool
pub(crate) fn get_conn(pool: &Pool<SqliteConnectionManager>) -> Result<PooledConn, StorageError> {
    Ok(pool.get()?)
}

/// Parse JSON from string, converting error to rusqlite error
pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(s: &str) -> rusqlite::Result<T> {
    serde_json::from_str(s).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn conversion_failure(
    idx: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
}

pub(crate) fn parse_timestamp(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| conversion_failure(idx, e))
}

pub(crate) fn parse_date(idx: usize, s: Option<String>) -> rusqlite::Result<Option<NaiveDate>> {
    s.map(|v| NaiveDate::parse_from_str(&v, "%Y-%m-%d").map_err(|e| conversion_failure(idx, e)))
        .transpose()
}

pub(crate) fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

pub(crate) fn to_u32(idx: usize, v: i64) -> rusqlite::Result<u32> {
    u32::try_from(v).map_err(|e| conversion_failure(idx, e))
}

pub(crate) const BOOK_COLUMNS: &str =
    "id, title, author, isbn, genres, published_date, page_count, summary, cover_image_url,
     critic_score, calculated_critic_score, critic_review_count, created_at";

pub(crate) const REVIEW_COLUMNS: &str =
    "id, book_id, isbn, quote, critic_name, publication, review_url, rating, review_date,
     created_at, updated_at";

/// Map a row selected with [`BOOK_COLUMNS`].
pub(crate) fn row_to_book(row: &rusqlite::Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        isbn: row.get(3)?,
        genres: parse_json(&row.get::<_, String>(4)?)?,
        published_date: parse_date(5, row.get(5)?)?,
        page_count: row.get::<_, Option<i64>>(6)?.map(|v| to_u32(6, v)).transpose()?,
        summary: row.get(7)?,
        cover_image_url: row.get(8)?,
        critic_score: row.get(9)?,
        calculated_critic_score: row.get(10)?,
        critic_review_count: to_u32(11, row.get(11)?)?,
        created_at: parse_timestamp(12, &row.get::<_, String>(12)?)?,
    })
}

/// Map a row selected with [`REVIEW_COLUMNS`].
pub(crate) fn row_to_review(row: &rusqlite::Row<'_>) -> rusqlite::Result<CriticReview> {
    Ok(CriticReview {
        id: row.get(0)?,
        book_id: row.get(1)?,
        isbn: row.get(2)?,
        quote: row.get(3)?,
        critic_name: row.get(4)?,
        publication: row.get(5)?,
        review_url: row.get(6)?,
        rating: row.get(7)?,
        review_date: parse_date(8, row.get(8)?)?,
        created_at: parse_timestamp(9, &row.get::<_, String>(9)?)?,
        updated_at: parse_timestamp(10, &row.get::<_, String>(10)?)?,
    })
}

/// Per-connection settings. Foreign keys are off by default in SQLite and
/// review rows rely on `ON DELETE CASCADE`.
fn init_connection(conn: &mut Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA busy_timeout = 30000;
         PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA foreign_keys = ON;",
    )?;
    Ok(())
}

impl Storage {
    /// Create new storage instance with `SQLite` connection pool
    pub fn new(db_path: &Path) -> Result<Self, StorageError> {
        let manager = SqliteConnectionManager::file(db_path).with_init(init_connection);

        let pool_size = env_parse_with_default("SHELFSCORE_DB_POOL_SIZE", 8_u32).max(1);
        let pool = Pool::builder().max_size(pool_size).build(manager)?;

        let conn = pool.get()?;
        migrations::run_migrations(&conn).map_err(|e| StorageError::Migration(e.to_string()))?;
        drop(conn);

        tracing::info!(pool_size = pool_size, path = %db_path.display(), "Storage initialized with connection pool");

        Ok(Self { pool })
    }
}
