//! PostgreSQL storage backend using sqlx.
//!
//! Split into modular files by domain concern.

// Absolute paths in error handling are acceptable
#![allow(clippy::absolute_paths, reason = "std paths in error handling are clear")]

mod books;
mod reviews;
mod scores;
mod stats;

use chrono::{DateTime, NaiveDate, Utc};
use shelfscore_core::{
    Book, CriticReview, PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_IDLE_TIMEOUT_SECS,
    PG_POOL_MAX_CONNECTIONS,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::error::StorageError;

use super::pg_migrations::run_pg_migrations;

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(std::time::Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(std::time::Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        run_pg_migrations(&pool).await.map_err(|e| StorageError::Migration(e.to_string()))?;
        tracing::info!("PgStorage initialized");
        Ok(Self { pool })
    }
}

pub(crate) const BOOK_COLUMNS: &str =
    "id, title, author, isbn, genres, published_date, page_count, summary, cover_image_url,
     critic_score, calculated_critic_score, critic_review_count, created_at";

pub(crate) const REVIEW_COLUMNS: &str =
    "id, book_id, isbn, quote, critic_name, publication, review_url, rating, review_date,
     created_at, updated_at";

/// Convert `usize` to `i64` for SQL LIMIT/OFFSET binds.
/// Saturates to `i64::MAX` on overflow (only possible on 128-bit targets).
pub(crate) fn usize_to_i64(val: usize) -> i64 {
    i64::try_from(val).unwrap_or(i64::MAX)
}

fn non_negative(column: &str, value: i32) -> Result<u32, StorageError> {
    u32::try_from(value).map_err(|e| StorageError::DataCorruption {
        context: format!("negative {column}: {value}"),
        source: Box::new(e),
    })
}

pub(crate) fn row_to_book(row: &sqlx::postgres::PgRow) -> Result<Book, StorageError> {
    let published_date: Option<NaiveDate> = row.try_get("published_date")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let page_count = row
        .try_get::<Option<i32>, _>("page_count")?
        .map(|v| non_negative("page_count", v))
        .transpose()?;
    Ok(Book {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        isbn: row.try_get("isbn")?,
        genres: row.try_get("genres")?,
        published_date,
        page_count,
        summary: row.try_get("summary")?,
        cover_image_url: row.try_get("cover_image_url")?,
        critic_score: row.try_get("critic_score")?,
        calculated_critic_score: row.try_get("calculated_critic_score")?,
        critic_review_count: non_negative(
            "critic_review_count",
            row.try_get("critic_review_count")?,
        )?,
        created_at,
    })
}

pub(crate) fn row_to_review(row: &sqlx::postgres::PgRow) -> Result<CriticReview, StorageError> {
    Ok(CriticReview {
        id: row.try_get("id")?,
        book_id: row.try_get("book_id")?,
        isbn: row.try_get("isbn")?,
        quote: row.try_get("quote")?,
        critic_name: row.try_get("critic_name")?,
        publication: row.try_get("publication")?,
        review_url: row.try_get("review_url")?,
        rating: row.try_get("rating")?,
        review_date: row.try_get("review_date")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
