use shelfscore_core::{
    FailureKind, IngestKind, IngestReport, IngestState, NewBook, RecordFailure,
};
use shelfscore_storage::CatalogStore;

use super::{clear_failed, enter, finish, IngestionService};
use crate::config::IngestMode;
use crate::ServiceError;

const RUN: IngestKind = IngestKind::Books;

impl<S: CatalogStore> IngestionService<S> {
    /// Replace the books table with the dataset's books.
    pub async fn ingest_books(&self) -> Result<IngestReport, ServiceError> {
        let mut report = IngestReport::new(RUN);
        report.attempted = self.dataset.books.len();

        let mut books = Vec::with_capacity(report.attempted);
        for seed in &self.dataset.books {
            match NewBook::try_from(seed.clone()) {
                Ok(book) => books.push(book),
                Err(e) => {
                    tracing::warn!(book = %seed.label(), error = %e, "Invalid book seed");
                    report.record_failure(RecordFailure::new(
                        FailureKind::Invalid,
                        seed.label(),
                        e.to_string(),
                    ));
                },
            }
        }

        match self.config.mode {
            IngestMode::Atomic => self.store_books_atomic(&books, &mut report).await?,
            IngestMode::Sequential => self.store_books_sequential(&books, &mut report).await?,
        }

        Ok(finish(report))
    }

    async fn store_books_atomic(
        &self,
        books: &[NewBook],
        report: &mut IngestReport,
    ) -> Result<(), ServiceError> {
        enter(RUN, IngestState::Clearing);
        enter(RUN, IngestState::Inserting);
        let failures = self.storage.replace_books(books).await.map_err(|e| clear_failed(RUN, e))?;

        report.succeeded = books.len().saturating_sub(failures.len());
        for failure in failures {
            let key = books.get(failure.index).map_or_else(String::new, book_key);
            tracing::warn!(book = %key, error = %failure.error, "Book insert failed");
            report.record_failure(RecordFailure::new(
                FailureKind::Insert,
                key,
                failure.error.to_string(),
            ));
        }
        Ok(())
    }

    async fn store_books_sequential(
        &self,
        books: &[NewBook],
        report: &mut IngestReport,
    ) -> Result<(), ServiceError> {
        enter(RUN, IngestState::Clearing);
        self.storage.delete_all_books().await.map_err(|e| clear_failed(RUN, e))?;

        enter(RUN, IngestState::Inserting);
        for (i, book) in books.iter().enumerate() {
            if i > 0 && !self.config.pacing.is_zero() {
                tokio::time::sleep(self.config.pacing).await;
            }
            match self.storage.insert_book(book).await {
                Ok(_) => report.succeeded += 1,
                Err(e) => {
                    tracing::warn!(book = %book_key(book), error = %e, "Book insert failed");
                    report.record_failure(RecordFailure::new(
                        FailureKind::Insert,
                        book_key(book),
                        e.to_string(),
                    ));
                },
            }
        }
        Ok(())
    }
}

fn book_key(book: &NewBook) -> String {
    match &book.isbn {
        Some(isbn) => format!("{} ({isbn})", book.title),
        None => book.title.clone(),
    }
}
