//! Shared fixtures for service tests.

#![allow(clippy::unwrap_used, reason = "test code")]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use shelfscore_core::{
    Book, BookQuery, BookSeed, CriticReview, Dataset, Isbn, NewBook, NewCriticReview, ReviewSeed,
    ScoreSummary,
};
use shelfscore_storage::{
    BookStore, CatalogStats, CriticReviewStore, PaginatedResult, RowFailure, ScoreProcedure,
    StatsStore, StorageBackend, StorageError,
};
use tempfile::TempDir;

use crate::config::{IngestConfig, IngestMode, ScoreMode};

pub fn create_test_backend() -> (Arc<StorageBackend>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let backend = StorageBackend::new_sqlite(&temp_dir.path().join("test.db")).unwrap();
    (Arc::new(backend), temp_dir)
}

pub fn config(mode: IngestMode) -> IngestConfig {
    IngestConfig::default()
        .with_mode(mode)
        .with_pacing(Duration::ZERO)
        .with_score_mode(ScoreMode::Local)
}

pub fn book_seed(title: &str, isbn: &str) -> BookSeed {
    BookSeed {
        title: title.to_owned(),
        author: "Test Author".to_owned(),
        isbn: Some(isbn.to_owned()),
        genres: vec!["Fiction".to_owned()],
        ..BookSeed::default()
    }
}

pub fn review_seed(isbn: &str, title: Option<&str>, critic: &str, rating: Option<f64>) -> ReviewSeed {
    ReviewSeed {
        isbn: Some(isbn.to_owned()),
        expected_title: title.map(ToOwned::to_owned),
        quote: format!("{critic} on this book"),
        critic_name: critic.to_owned(),
        publication: "Test Review".to_owned(),
        rating,
        ..ReviewSeed::default()
    }
}

pub fn dataset(books: Vec<BookSeed>, reviews: Vec<ReviewSeed>) -> Arc<Dataset> {
    Arc::new(Dataset { books, reviews })
}

/// Wraps a real backend and fails selected operations on demand.
pub struct FlakyStore {
    pub inner: Arc<StorageBackend>,
    pub fail_clear_books: AtomicBool,
    pub fail_clear_reviews: AtomicBool,
    /// Fail score writes for this book id.
    pub fail_score_for: Option<String>,
}

impl FlakyStore {
    pub fn new(inner: Arc<StorageBackend>) -> Self {
        Self {
            inner,
            fail_clear_books: AtomicBool::new(false),
            fail_clear_reviews: AtomicBool::new(false),
            fail_score_for: None,
        }
    }

    fn injected(what: &str) -> StorageError {
        StorageError::Pool(format!("injected failure: {what}"))
    }
}

#[async_trait]
impl BookStore for FlakyStore {
    async fn insert_book(&self, book: &NewBook) -> Result<Book, StorageError> {
        self.inner.insert_book(book).await
    }
    async fn get_book(&self, id: &str) -> Result<Option<Book>, StorageError> {
        self.inner.get_book(id).await
    }
    async fn get_book_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>, StorageError> {
        self.inner.get_book_by_isbn(isbn).await
    }
    async fn list_book_ids(&self) -> Result<Vec<String>, StorageError> {
        self.inner.list_book_ids().await
    }
    async fn query_books(&self, query: &BookQuery) -> Result<PaginatedResult<Book>, StorageError> {
        self.inner.query_books(query).await
    }
    async fn update_book_score(&self, score: &ScoreSummary) -> Result<(), StorageError> {
        if self.fail_score_for.as_deref() == Some(score.book_id.as_str()) {
            return Err(Self::injected("update_book_score"));
        }
        self.inner.update_book_score(score).await
    }
    async fn delete_all_books(&self) -> Result<u64, StorageError> {
        if self.fail_clear_books.load(Ordering::SeqCst) {
            return Err(Self::injected("delete_all_books"));
        }
        self.inner.delete_all_books().await
    }
    async fn replace_books(&self, books: &[NewBook]) -> Result<Vec<RowFailure>, StorageError> {
        if self.fail_clear_books.load(Ordering::SeqCst) {
            return Err(Self::injected("replace_books"));
        }
        self.inner.replace_books(books).await
    }
}

#[async_trait]
impl CriticReviewStore for FlakyStore {
    async fn insert_review(&self, review: &NewCriticReview) -> Result<CriticReview, StorageError> {
        self.inner.insert_review(review).await
    }
    async fn get_reviews_for_book(
        &self,
        book_id: &str,
    ) -> Result<Vec<CriticReview>, StorageError> {
        self.inner.get_reviews_for_book(book_id).await
    }
    async fn delete_all_reviews(&self) -> Result<u64, StorageError> {
        if self.fail_clear_reviews.load(Ordering::SeqCst) {
            return Err(Self::injected("delete_all_reviews"));
        }
        self.inner.delete_all_reviews().await
    }
    async fn replace_reviews(
        &self,
        reviews: &[NewCriticReview],
    ) -> Result<Vec<RowFailure>, StorageError> {
        if self.fail_clear_reviews.load(Ordering::SeqCst) {
            return Err(Self::injected("replace_reviews"));
        }
        self.inner.replace_reviews(reviews).await
    }
}

#[async_trait]
impl ScoreProcedure for FlakyStore {
    async fn recompute_critic_score(&self, book_id: &str) -> Result<ScoreSummary, StorageError> {
        if self.fail_score_for.as_deref() == Some(book_id) {
            return Err(Self::injected("recompute_critic_score"));
        }
        self.inner.recompute_critic_score(book_id).await
    }
}

#[async_trait]
impl StatsStore for FlakyStore {
    async fn get_stats(&self) -> Result<CatalogStats, StorageError> {
        self.inner.get_stats().await
    }
    async fn count_books(&self, genre: Option<&str>) -> Result<u64, StorageError> {
        self.inner.count_books(genre).await
    }
}
