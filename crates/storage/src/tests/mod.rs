//! Test utilities and module declarations for storage tests.

use crate::Storage;
use shelfscore_core::{Book, BookSeed, NewBook, NewCriticReview, ReviewCandidate, ReviewSeed};
use tempfile::TempDir;

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn create_test_storage() -> (Storage, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let storage = Storage::new(&db_path).unwrap();
    (storage, temp_dir)
}

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn create_test_book(isbn: &str, title: &str) -> NewBook {
    NewBook::try_from(BookSeed {
        title: title.to_owned(),
        author: "Test Author".to_owned(),
        isbn: Some(isbn.to_owned()),
        genres: vec!["Fiction".to_owned()],
        published_date: Some("2021-05-04".to_owned()),
        page_count: Some(320),
        ..BookSeed::default()
    })
    .unwrap()
}

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn create_test_review(book: &Book, critic: &str, rating: Option<f64>) -> NewCriticReview {
    let candidate = ReviewCandidate::try_from(ReviewSeed {
        isbn: book.isbn.clone(),
        expected_title: Some(book.title.clone()),
        quote: format!("{critic} liked it"),
        critic_name: critic.to_owned(),
        publication: "The Test Review".to_owned(),
        rating,
        review_date: Some("2021-06-01".to_owned()),
        ..ReviewSeed::default()
    })
    .unwrap();
    candidate.attach(book)
}

mod book_tests;
