use std::sync::Arc;

use shelfscore_core::{Book, BookQuery, CriticReview};
use shelfscore_storage::{CatalogStats, CatalogStore, PaginatedResult, StorageBackend};

use crate::ServiceError;

/// Read side of the catalogue.
pub struct CatalogService<S = StorageBackend> {
    storage: Arc<S>,
}

impl<S: CatalogStore> CatalogService<S> {
    #[must_use]
    pub const fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    pub async fn list_books(&self, query: &BookQuery) -> Result<PaginatedResult<Book>, ServiceError> {
        Ok(self.storage.query_books(query).await?)
    }

    pub async fn get_book(&self, id: &str) -> Result<Book, ServiceError> {
        self.storage.get_book(id).await?.ok_or_else(|| ServiceError::book_not_found(id))
    }

    /// Reviews of an existing book, newest first. `NotFound` for an unknown book
    /// so callers can tell "no reviews yet" from "no such book".
    pub async fn reviews_for_book(&self, id: &str) -> Result<Vec<CriticReview>, ServiceError> {
        if self.storage.get_book(id).await?.is_none() {
            return Err(ServiceError::book_not_found(id));
        }
        Ok(self.storage.get_reviews_for_book(id).await?)
    }

    pub async fn stats(&self) -> Result<CatalogStats, ServiceError> {
        Ok(self.storage.get_stats().await?)
    }
}
