use std::collections::HashMap;

use shelfscore_core::{
    match_review, Book, FailureKind, IngestKind, IngestReport, IngestState, NewCriticReview,
    RecordFailure, ReviewCandidate,
};
use shelfscore_storage::CatalogStore;

use super::{clear_failed, enter, finish, IngestionService};
use crate::config::IngestMode;
use crate::ServiceError;

const RUN: IngestKind = IngestKind::Reviews;

/// Books resolved so far in this run, keyed by normalized ISBN.
type BookCache = HashMap<String, Option<Book>>;

impl<S: CatalogStore> IngestionService<S> {
    /// Replace the critic_reviews table with the dataset's reviews, then
    /// recompute every book's score.
    pub async fn ingest_reviews(&self) -> Result<IngestReport, ServiceError> {
        let mut report = IngestReport::new(RUN);
        report.attempted = self.dataset.reviews.len();

        let mut candidates = Vec::with_capacity(report.attempted);
        for seed in &self.dataset.reviews {
            match ReviewCandidate::try_from(seed.clone()) {
                Ok(candidate) => candidates.push((seed.label(), candidate)),
                Err(e) => {
                    tracing::warn!(review = %seed.label(), error = %e, "Invalid review seed");
                    report.record_failure(RecordFailure::new(
                        FailureKind::Invalid,
                        seed.label(),
                        e.to_string(),
                    ));
                },
            }
        }

        match self.config.mode {
            IngestMode::Atomic => self.store_reviews_atomic(candidates, &mut report).await?,
            IngestMode::Sequential => {
                self.store_reviews_sequential(candidates, &mut report).await?;
            },
        }

        enter(RUN, IngestState::Aggregating);
        let batch = self.scores.recompute_all().await?;
        report.books_processed = batch.updated.len();
        for failure in batch.failures {
            report.record_failure(failure);
        }

        Ok(finish(report))
    }

    /// Match everything first, then clear and insert in one transaction.
    async fn store_reviews_atomic(
        &self,
        candidates: Vec<(String, ReviewCandidate)>,
        report: &mut IngestReport,
    ) -> Result<(), ServiceError> {
        enter(RUN, IngestState::Matching);
        let mut cache = BookCache::new();
        let mut approved = Vec::with_capacity(candidates.len());
        for (label, candidate) in candidates {
            if let Some(review) = self.approve(&mut cache, &label, candidate, report).await {
                approved.push((label, review));
            }
        }

        enter(RUN, IngestState::Clearing);
        enter(RUN, IngestState::Inserting);
        let reviews: Vec<NewCriticReview> = approved.iter().map(|(_, r)| r.clone()).collect();
        let failures =
            self.storage.replace_reviews(&reviews).await.map_err(|e| clear_failed(RUN, e))?;

        report.succeeded = reviews.len().saturating_sub(failures.len());
        for failure in failures {
            let key = approved.get(failure.index).map(|(label, _)| label.clone()).unwrap_or_default();
            tracing::warn!(review = %key, error = %failure.error, "Review insert failed");
            report.record_failure(RecordFailure::new(
                FailureKind::Insert,
                key,
                failure.error.to_string(),
            ));
        }
        Ok(())
    }

    /// Clear first, then match and insert one candidate at a time.
    async fn store_reviews_sequential(
        &self,
        candidates: Vec<(String, ReviewCandidate)>,
        report: &mut IngestReport,
    ) -> Result<(), ServiceError> {
        enter(RUN, IngestState::Clearing);
        self.storage.delete_all_reviews().await.map_err(|e| clear_failed(RUN, e))?;

        enter(RUN, IngestState::Inserting);
        let mut cache = BookCache::new();
        for (label, candidate) in candidates {
            enter(RUN, IngestState::Matching);
            let Some(review) = self.approve(&mut cache, &label, candidate, report).await else {
                continue;
            };
            match self.storage.insert_review(&review).await {
                Ok(_) => report.succeeded += 1,
                Err(e) => {
                    tracing::warn!(review = %label, error = %e, "Review insert failed");
                    report.record_failure(RecordFailure::new(
                        FailureKind::Insert,
                        label,
                        e.to_string(),
                    ));
                },
            }
        }
        Ok(())
    }

    /// Resolve the candidate's book and run the matcher. Rejections are
    /// recorded on `report` and yield `None`.
    async fn approve(
        &self,
        cache: &mut BookCache,
        label: &str,
        candidate: ReviewCandidate,
        report: &mut IngestReport,
    ) -> Option<NewCriticReview> {
        let isbn = candidate.isbn.as_str().to_owned();
        let cached = cache.get(&isbn).cloned();
        let book = match cached {
            Some(book) => book,
            None => match self.storage.get_book_by_isbn(&candidate.isbn).await {
                Ok(found) => {
                    cache.insert(isbn.clone(), found.clone());
                    found
                },
                Err(e) => {
                    tracing::warn!(review = %label, isbn = %isbn, error = %e, "Book lookup failed");
                    report.record_failure(RecordFailure::new(
                        FailureKind::Insert,
                        label,
                        format!("book lookup failed: {e}"),
                    ));
                    return None;
                },
            },
        };

        let Some(book) = book else {
            tracing::warn!(review = %label, isbn = %isbn, "No book with this ISBN, review skipped");
            report.record_failure(RecordFailure::new(
                FailureKind::BookNotFound,
                label,
                format!("no book with ISBN {isbn}"),
            ));
            return None;
        };

        let decision = match_review(&candidate, &book);
        if let Some(reason) = decision.reason() {
            tracing::warn!(review = %label, book_id = %book.id, reason = %reason, "Review rejected");
            report.record_failure(RecordFailure::new(FailureKind::Validation, label, reason));
            return None;
        }
        Some(candidate.attach(&book))
    }
}
