//! Bulk ingestion runs.
//!
//! Each run replaces one table with the contents of the configured dataset:
//! `Idle → Clearing → Inserting → (Matching → Aggregating) → Reporting → Idle`.
//! A failure to clear the table aborts the run; everything after that is
//! recorded per record in the returned [`IngestReport`] and the run continues.

mod books;
mod reviews;


use std::sync::Arc;

use serde::Serialize;
use shelfscore_core::{Dataset, IngestKind, IngestReport, IngestState};
use shelfscore_storage::{CatalogStore, StorageBackend};

use crate::config::IngestConfig;
use crate::score_service::ScoreService;
use crate::ServiceError;

/// Reports of a books-then-reviews run.
#[derive(Debug, Clone, Serialize)]
pub struct CombinedReport {
    pub books: IngestReport,
    pub reviews: IngestReport,
}

pub struct IngestionService<S = StorageBackend> {
    pub(crate) storage: Arc<S>,
    pub(crate) scores: ScoreService<S>,
    pub(crate) dataset: Arc<Dataset>,
    pub(crate) config: IngestConfig,
}

impl<S: CatalogStore> IngestionService<S> {
    #[must_use]
    pub fn new(storage: Arc<S>, dataset: Arc<Dataset>, config: IngestConfig) -> Self {
        let scores = ScoreService::new(Arc::clone(&storage), config.score_mode);
        Self { storage, scores, dataset, config }
    }

    pub const fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Book-ingestion followed by review-ingestion. A fatal book run stops
    /// before reviews are touched.
    pub async fn ingest_all(&self) -> Result<CombinedReport, ServiceError> {
        let books = self.ingest_books().await?;
        let reviews = self.ingest_reviews().await?;
        Ok(CombinedReport { books, reviews })
    }
}

pub(crate) fn enter(run: IngestKind, state: IngestState) {
    tracing::debug!(run = %run, state = state.as_str(), "Ingestion state change");
}

/// `Reporting → Idle`: log the summary and hand the report back.
pub(crate) fn finish(report: IngestReport) -> IngestReport {
    enter(report.kind, IngestState::Reporting);
    tracing::info!(
        run = %report.kind,
        attempted = report.attempted,
        succeeded = report.succeeded,
        errors = report.errors().count(),
        validation_errors = report.validation_errors,
        skipped_missing_book = report.skipped_missing_book,
        books_processed = report.books_processed,
        "Ingestion run complete"
    );
    enter(report.kind, IngestState::Idle);
    report
}

/// Log a fatal clear failure and wrap it.
pub(crate) fn clear_failed(run: IngestKind, source: shelfscore_storage::StorageError) -> ServiceError {
    tracing::error!(run = %run, table = run.table(), error = %source, "Clearing table failed, run aborted");
    enter(run, IngestState::Idle);
    ServiceError::ClearFailed { table: run.table(), source }
}
