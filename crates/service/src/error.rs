//! Typed error enum for the service layer.
//!
//! Unifies storage and catalogue failures into a single error type so
//! handlers can map specific failure modes to responses.

use shelfscore_core::CatalogError;
use shelfscore_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed (DB, not found, duplicate, etc.).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Dataset could not be loaded or parsed.
    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// The target table could not be cleared; the run was aborted before any insert.
    #[error("failed to clear {table}: {source}")]
    ClearFailed {
        table: &'static str,
        #[source]
        source: StorageError,
    },

    /// Caller provided invalid input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Required backend is not configured.
    #[error("not configured: {0}")]
    NotConfigured(String),
}

impl ServiceError {
    /// Whether this error is likely transient (worth retrying).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Storage(e) | Self::ClearFailed { source: e, .. } => e.is_transient(),
            _ => false,
        }
    }

    /// Whether this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_not_found())
    }

    /// Whether this error represents a duplicate/conflict.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_duplicate())
    }

    pub(crate) fn book_not_found(id: &str) -> Self {
        Self::Storage(StorageError::NotFound { entity: "book", id: id.to_owned() })
    }
}
