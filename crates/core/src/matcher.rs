//! Review-to-book matching.
//!
//! Seed reviews are keyed by ISBN. ISBN reuse across editions and
//! transcription errors mean an ISBN can resolve to a different book than the
//! curator intended, so a candidate carrying an expected title is only
//! accepted when that title equals the resolved book's title exactly.

use crate::book::Book;
use crate::review::ReviewCandidate;

/// Outcome of matching a candidate review against its resolved book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchDecision {
    Approved,
    /// The candidate names a different title than the book its ISBN resolved to.
    TitleMismatch { expected: String, actual: String },
    /// The resolved book does not carry the candidate's ISBN.
    IsbnMismatch { candidate: String, book: Option<String> },
}

impl MatchDecision {
    #[must_use]
    pub const fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }

    /// Reason string for rejected decisions.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Approved => None,
            Self::TitleMismatch { expected, actual } => {
                Some(format!("expected title '{expected}' but ISBN resolves to '{actual}'"))
            },
            Self::IsbnMismatch { candidate, book } => Some(format!(
                "review ISBN {candidate} does not match book ISBN {}",
                book.as_deref().unwrap_or("<none>")
            )),
        }
    }
}

/// Decide whether `candidate` may be attached to `book`. Pure: no state is touched.
#[must_use]
pub fn match_review(candidate: &ReviewCandidate, book: &Book) -> MatchDecision {
    if !book.has_isbn(&candidate.isbn) {
        return MatchDecision::IsbnMismatch {
            candidate: candidate.isbn.to_string(),
            book: book.isbn.clone(),
        };
    }
    match &candidate.expected_title {
        Some(expected) if expected != &book.title => MatchDecision::TitleMismatch {
            expected: expected.clone(),
            actual: book.title.clone(),
        },
        _ => MatchDecision::Approved,
    }
}
