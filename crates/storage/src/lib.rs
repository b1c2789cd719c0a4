//! Storage layer for shelfscore
//!
//! Async store traits over the `books` and `critic_reviews` tables, with a
//! SQLite backend (r2d2 pool, default) and a PostgreSQL backend (sqlx,
//! `postgres` feature), unified behind [`StorageBackend`].

mod backend;
pub mod error;
#[cfg(feature = "sqlite")]
mod migrations;
#[cfg(feature = "postgres")]
mod pg_migrations;
#[cfg(feature = "postgres")]
mod pg_storage;
mod sql;
#[cfg(feature = "sqlite")]
mod sqlite_async;
#[cfg(feature = "sqlite")]
mod storage;
#[cfg(all(test, feature = "sqlite"))]
mod tests;
pub mod traits;
mod types;

pub use backend::StorageBackend;
pub use error::StorageError;
#[cfg(feature = "postgres")]
pub use pg_storage::PgStorage;
#[cfg(feature = "sqlite")]
pub use storage::Storage;
pub use traits::{BookStore, CatalogStore, CriticReviewStore, ScoreProcedure, StatsStore};
pub use types::{CatalogStats, PaginatedResult, RowFailure};
