//! Async trait implementations for SQLite `Storage` via `spawn_blocking`.

use async_trait::async_trait;
use shelfscore_core::{
    Book, BookQuery, CriticReview, Isbn, NewBook, NewCriticReview, ScoreSummary,
};

use crate::error::StorageError;
use crate::traits::{BookStore, CriticReviewStore, ScoreProcedure, StatsStore};
use crate::types::{CatalogStats, PaginatedResult, RowFailure};
use crate::Storage;

/// Helper: run a blocking closure on the tokio blocking pool.
async fn blocking<F, T>(f: F) -> Result<T, StorageError>
where
    F: FnOnce() -> Result<T, StorageError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

/// Body-generating macro for async-to-blocking delegation.
///
/// Each argument is annotated with a capture kind:
/// - `@ref arg`      : `.clone()` a `&T`, pass as `&arg`
/// - `@str arg`      : `.to_owned()` a `&str`, pass as `&arg`
/// - `@opt_str arg`  : `.map(ToOwned::to_owned)` an `Option<&str>`, pass as `arg.as_deref()`
/// - `@slice arg`    : `.to_vec()` a `&[T]`, pass as `&arg`
macro_rules! delegate {
    ($self:ident, $method:ident $(, @$kind:ident $arg:ident)*) => {{
        let s = $self.clone();
        $(delegate!(@capture $kind $arg);)*
        blocking(move || s.$method($(delegate!(@pass $kind $arg)),*)).await
    }};
    (@capture ref $arg:ident) => { let $arg = $arg.clone(); };
    (@capture str $arg:ident) => { let $arg = $arg.to_owned(); };
    (@capture opt_str $arg:ident) => { let $arg = $arg.map(ToOwned::to_owned); };
    (@capture slice $arg:ident) => { let $arg = $arg.to_vec(); };
    (@pass ref $arg:ident) => { &$arg };
    (@pass str $arg:ident) => { &$arg };
    (@pass opt_str $arg:ident) => { $arg.as_deref() };
    (@pass slice $arg:ident) => { &$arg };
}

// ── BookStore ────────────────────────────────────────────────────

#[async_trait]
impl BookStore for Storage {
    async fn insert_book(&self, book: &NewBook) -> Result<Book, StorageError> {
        delegate!(self, insert_book, @ref book)
    }
    async fn get_book(&self, id: &str) -> Result<Option<Book>, StorageError> {
        delegate!(self, get_book, @str id)
    }
    async fn get_book_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>, StorageError> {
        delegate!(self, get_book_by_isbn, @ref isbn)
    }
    async fn list_book_ids(&self) -> Result<Vec<String>, StorageError> {
        delegate!(self, list_book_ids)
    }
    async fn query_books(&self, query: &BookQuery) -> Result<PaginatedResult<Book>, StorageError> {
        delegate!(self, query_books, @ref query)
    }
    async fn update_book_score(&self, score: &ScoreSummary) -> Result<(), StorageError> {
        delegate!(self, update_book_score, @ref score)
    }
    async fn delete_all_books(&self) -> Result<u64, StorageError> {
        delegate!(self, delete_all_books)
    }
    async fn replace_books(&self, books: &[NewBook]) -> Result<Vec<RowFailure>, StorageError> {
        delegate!(self, replace_books, @slice books)
    }
}

// ── CriticReviewStore ────────────────────────────────────────────

#[async_trait]
impl CriticReviewStore for Storage {
    async fn insert_review(&self, review: &NewCriticReview) -> Result<CriticReview, StorageError> {
        delegate!(self, insert_review, @ref review)
    }
    async fn get_reviews_for_book(
        &self,
        book_id: &str,
    ) -> Result<Vec<CriticReview>, StorageError> {
        delegate!(self, get_reviews_for_book, @str book_id)
    }
    async fn delete_all_reviews(&self) -> Result<u64, StorageError> {
        delegate!(self, delete_all_reviews)
    }
    async fn replace_reviews(
        &self,
        reviews: &[NewCriticReview],
    ) -> Result<Vec<RowFailure>, StorageError> {
        delegate!(self, replace_reviews, @slice reviews)
    }
}

// ── ScoreProcedure ───────────────────────────────────────────────

#[async_trait]
impl ScoreProcedure for Storage {
    async fn recompute_critic_score(&self, book_id: &str) -> Result<ScoreSummary, StorageError> {
        delegate!(self, recompute_critic_score, @str book_id)
    }
}

// ── StatsStore ───────────────────────────────────────────────────

#[async_trait]
impl StatsStore for Storage {
    async fn get_stats(&self) -> Result<CatalogStats, StorageError> {
        delegate!(self, get_stats)
    }
    async fn count_books(&self, genre: Option<&str>) -> Result<u64, StorageError> {
        delegate!(self, count_books, @opt_str genre)
    }
}
