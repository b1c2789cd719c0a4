//! Response types (Serialize)

use serde::{Deserialize, Serialize};
use shelfscore_core::{IngestKind, IngestReport, RecordFailure};
use shelfscore_service::{CombinedReport, ServiceError};

/// Result of one ingestion endpoint call.
///
/// Book runs fill `booksAdded`/`failedBooks`; review runs fill the
/// `reviewsAdded` family. A fatal run carries only `success: false` and `error`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub success: bool,
    /// Seed records the run tried to process.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempted: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books_added: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_books: Option<Vec<RecordFailure>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews_added: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books_processed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped_missing_book: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failures: Option<Vec<RecordFailure>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IngestResponse {
    pub fn failed(err: &ServiceError) -> Self {
        Self { success: false, error: Some(err.to_string()), ..Self::default() }
    }
}

impl From<IngestReport> for IngestResponse {
    fn from(report: IngestReport) -> Self {
        match report.kind {
            IngestKind::Books => Self {
                success: true,
                attempted: Some(report.attempted),
                books_added: Some(report.succeeded),
                failed_books: Some(report.failures),
                ..Self::default()
            },
            IngestKind::Reviews => Self {
                success: true,
                attempted: Some(report.attempted),
                reviews_added: Some(report.succeeded),
                books_processed: Some(report.books_processed),
                validation_errors: Some(report.validation_errors),
                skipped_missing_book: Some(report.skipped_missing_book),
                failures: Some(report.failures),
                ..Self::default()
            },
        }
    }
}

/// Result of `POST /api/ingest/all`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CombinedIngestResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books: Option<IngestResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<IngestResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CombinedIngestResponse {
    pub fn failed(err: &ServiceError) -> Self {
        Self { success: false, error: Some(err.to_string()), ..Self::default() }
    }
}

impl From<CombinedReport> for CombinedIngestResponse {
    fn from(report: CombinedReport) -> Self {
        Self {
            success: true,
            books: Some(report.books.into()),
            reviews: Some(report.reviews.into()),
            error: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
}
