//! Result shapes shared by every backend.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// One window of a larger result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    /// Rows matching the filter, ignoring limit and offset.
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

/// Row counts for status reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub book_count: u64,
    pub review_count: u64,
    /// Books with a non-null calculated critic score.
    pub scored_book_count: u64,
    /// Reviews carrying a rating.
    pub rated_review_count: u64,
}

/// A record that a bulk replace could not insert; the rest of the batch still committed.
#[derive(Debug)]
pub struct RowFailure {
    /// Position of the record in the input slice.
    pub index: usize,
    pub error: StorageError,
}
