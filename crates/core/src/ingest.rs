//! Ingestion run vocabulary: run kinds, pipeline states and the run report.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which table an ingestion run replaces.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IngestKind {
    Books,
    Reviews,
}

impl IngestKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Books => "books",
            Self::Reviews => "reviews",
        }
    }

    /// Backing table name.
    #[must_use]
    pub const fn table(&self) -> &'static str {
        match self {
            Self::Books => "books",
            Self::Reviews => "critic_reviews",
        }
    }
}

impl fmt::Display for IngestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline states. Every run starts and ends at `Idle`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IngestState {
    Idle,
    Clearing,
    Inserting,
    Matching,
    Aggregating,
    Reporting,
}

impl IngestState {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Clearing => "clearing",
            Self::Inserting => "inserting",
            Self::Matching => "matching",
            Self::Aggregating => "aggregating",
            Self::Reporting => "reporting",
        }
    }
}

/// Why a single record did not make it into the store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Seed failed boundary validation.
    Invalid,
    /// Store rejected the insert.
    Insert,
    /// Review ISBN resolved to no stored book.
    BookNotFound,
    /// Review's expected title disagreed with the resolved book.
    Validation,
    /// Score recomputation failed for a book.
    Aggregation,
}

/// One per-record failure, kept in the run report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFailure {
    pub kind: FailureKind,
    /// Record label: book title/ISBN, review ISBN/critic, or book id.
    pub key: String,
    pub message: String,
}

impl RecordFailure {
    pub fn new(kind: FailureKind, key: impl Into<String>, message: impl Into<String>) -> Self {
        Self { kind, key: key.into(), message: message.into() }
    }
}

/// Summary returned by a completed ingestion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub kind: IngestKind,
    /// Seed records the run tried to process.
    pub attempted: usize,
    /// Records inserted.
    pub succeeded: usize,
    pub failures: Vec<RecordFailure>,
    /// Reviews rejected by title matching.
    pub validation_errors: usize,
    /// Reviews whose ISBN resolved to no book.
    pub skipped_missing_book: usize,
    /// Books whose score was recomputed successfully (review runs only).
    pub books_processed: usize,
}

impl IngestReport {
    #[must_use]
    pub const fn new(kind: IngestKind) -> Self {
        Self {
            kind,
            attempted: 0,
            succeeded: 0,
            failures: Vec::new(),
            validation_errors: 0,
            skipped_missing_book: 0,
            books_processed: 0,
        }
    }

    pub fn record_failure(&mut self, failure: RecordFailure) {
        match failure.kind {
            FailureKind::Validation => self.validation_errors += 1,
            FailureKind::BookNotFound => self.skipped_missing_book += 1,
            FailureKind::Invalid | FailureKind::Insert | FailureKind::Aggregation => {},
        }
        self.failures.push(failure);
    }

    /// Failures other than title-validation rejections and missing-book skips.
    pub fn errors(&self) -> impl Iterator<Item = &RecordFailure> {
        self.failures
            .iter()
            .filter(|f| !matches!(f.kind, FailureKind::Validation | FailureKind::BookNotFound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_failure_updates_counters_by_kind() {
        let mut report = IngestReport::new(IngestKind::Reviews);
        report.record_failure(RecordFailure::new(FailureKind::Validation, "a", "title"));
        report.record_failure(RecordFailure::new(FailureKind::BookNotFound, "b", "missing"));
        report.record_failure(RecordFailure::new(FailureKind::Insert, "c", "db"));
        assert_eq!(report.validation_errors, 1);
        assert_eq!(report.skipped_missing_book, 1);
        assert_eq!(report.failures.len(), 3);
        assert_eq!(report.errors().count(), 1);
    }

    #[test]
    fn kinds_name_their_tables() {
        assert_eq!(IngestKind::Books.table(), "books");
        assert_eq!(IngestKind::Reviews.table(), "critic_reviews");
    }
}
