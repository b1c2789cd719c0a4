use async_trait::async_trait;
use shelfscore_core::{Book, BookQuery, Isbn, NewBook, ScoreSummary};

use crate::error::StorageError;
use crate::types::{PaginatedResult, RowFailure};

/// Book table operations.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert one book. Derived score fields start empty.
    async fn insert_book(&self, book: &NewBook) -> Result<Book, StorageError>;

    /// Get book by ID.
    async fn get_book(&self, id: &str) -> Result<Option<Book>, StorageError>;

    /// Get book by normalized ISBN.
    async fn get_book_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>, StorageError>;

    /// IDs of every stored book, in insertion order.
    async fn list_book_ids(&self) -> Result<Vec<String>, StorageError>;

    /// Filtered, sorted window of books plus the total matching count.
    async fn query_books(&self, query: &BookQuery) -> Result<PaginatedResult<Book>, StorageError>;

    /// Persist derived score fields. `NotFound` if the book does not exist.
    async fn update_book_score(&self, score: &ScoreSummary) -> Result<(), StorageError>;

    /// Delete every book (reviews cascade). Returns rows deleted.
    async fn delete_all_books(&self) -> Result<u64, StorageError>;

    /// Clear the table and insert `books` in one transaction.
    ///
    /// Each insert runs under its own savepoint: a failing record is rolled
    /// back alone and reported, the rest commit. An `Err` means nothing changed.
    async fn replace_books(&self, books: &[NewBook]) -> Result<Vec<RowFailure>, StorageError>;
}
