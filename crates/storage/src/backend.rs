//! Unified storage backend with enum dispatch.

#[cfg(feature = "sqlite")]
use std::path::Path;

use async_trait::async_trait;
use shelfscore_core::{
    Book, BookQuery, CriticReview, Isbn, NewBook, NewCriticReview, ScoreSummary,
};

use crate::error::StorageError;
use crate::traits::{BookStore, CriticReviewStore, ScoreProcedure, StatsStore};
use crate::types::{CatalogStats, PaginatedResult, RowFailure};

macro_rules! dispatch {
    ($self:expr, $trait:path, $method:ident ( $($arg:expr),* $(,)? )) => {
        match $self {
            #[cfg(feature = "sqlite")]
            StorageBackend::Sqlite(s) => <crate::Storage as $trait>::$method(s, $($arg),*).await,
            #[cfg(feature = "postgres")]
            StorageBackend::Postgres(s) => <crate::pg_storage::PgStorage as $trait>::$method(s, $($arg),*).await,
        }
    };
}

#[derive(Clone, Debug)]
pub enum StorageBackend {
    #[cfg(feature = "sqlite")]
    Sqlite(crate::Storage),
    #[cfg(feature = "postgres")]
    Postgres(crate::pg_storage::PgStorage),
}

impl StorageBackend {
    #[cfg(feature = "sqlite")]
    pub fn new_sqlite(db_path: &Path) -> Result<Self, StorageError> {
        Ok(Self::Sqlite(crate::Storage::new(db_path)?))
    }

    #[cfg(feature = "postgres")]
    pub async fn new_postgres(database_url: &str) -> Result<Self, StorageError> {
        Ok(Self::Postgres(crate::pg_storage::PgStorage::new(database_url).await?))
    }

    /// Short backend name for logs and status output.
    pub const fn kind(&self) -> &'static str {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => "sqlite",
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => "postgres",
        }
    }
}

// ── BookStore ────────────────────────────────────────────────────

#[async_trait]
impl BookStore for StorageBackend {
    async fn insert_book(&self, book: &NewBook) -> Result<Book, StorageError> {
        dispatch!(self, BookStore, insert_book(book))
    }

    async fn get_book(&self, id: &str) -> Result<Option<Book>, StorageError> {
        dispatch!(self, BookStore, get_book(id))
    }

    async fn get_book_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>, StorageError> {
        dispatch!(self, BookStore, get_book_by_isbn(isbn))
    }

    async fn list_book_ids(&self) -> Result<Vec<String>, StorageError> {
        dispatch!(self, BookStore, list_book_ids())
    }

    async fn query_books(&self, query: &BookQuery) -> Result<PaginatedResult<Book>, StorageError> {
        dispatch!(self, BookStore, query_books(query))
    }

    async fn update_book_score(&self, score: &ScoreSummary) -> Result<(), StorageError> {
        dispatch!(self, BookStore, update_book_score(score))
    }

    async fn delete_all_books(&self) -> Result<u64, StorageError> {
        dispatch!(self, BookStore, delete_all_books())
    }

    async fn replace_books(&self, books: &[NewBook]) -> Result<Vec<RowFailure>, StorageError> {
        dispatch!(self, BookStore, replace_books(books))
    }
}

// ── CriticReviewStore ────────────────────────────────────────────

#[async_trait]
impl CriticReviewStore for StorageBackend {
    async fn insert_review(&self, review: &NewCriticReview) -> Result<CriticReview, StorageError> {
        dispatch!(self, CriticReviewStore, insert_review(review))
    }

    async fn get_reviews_for_book(
        &self,
        book_id: &str,
    ) -> Result<Vec<CriticReview>, StorageError> {
        dispatch!(self, CriticReviewStore, get_reviews_for_book(book_id))
    }

    async fn delete_all_reviews(&self) -> Result<u64, StorageError> {
        dispatch!(self, CriticReviewStore, delete_all_reviews())
    }

    async fn replace_reviews(
        &self,
        reviews: &[NewCriticReview],
    ) -> Result<Vec<RowFailure>, StorageError> {
        dispatch!(self, CriticReviewStore, replace_reviews(reviews))
    }
}

// ── ScoreProcedure ───────────────────────────────────────────────

#[async_trait]
impl ScoreProcedure for StorageBackend {
    async fn recompute_critic_score(&self, book_id: &str) -> Result<ScoreSummary, StorageError> {
        dispatch!(self, ScoreProcedure, recompute_critic_score(book_id))
    }
}

// ── StatsStore ───────────────────────────────────────────────────

#[async_trait]
impl StatsStore for StorageBackend {
    async fn get_stats(&self) -> Result<CatalogStats, StorageError> {
        dispatch!(self, StatsStore, get_stats())
    }

    async fn count_books(&self, genre: Option<&str>) -> Result<u64, StorageError> {
        dispatch!(self, StatsStore, count_books(genre))
    }
}
