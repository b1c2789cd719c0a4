use super::{create_test_book, create_test_storage};
use shelfscore_core::{BookQuery, BookSeed, BookSort, Isbn, NewBook, ScoreSummary};

#[test]
fn test_insert_and_get_book() {
    let (storage, _temp_dir) = create_test_storage();
    let book = create_test_book("978-0-399-59050-4", "Educated");

    let inserted = storage.insert_book(&book).unwrap();
    assert_eq!(inserted.calculated_critic_score, None);
    assert_eq!(inserted.critic_review_count, 0);

    let retrieved = storage.get_book(&book.id).unwrap().unwrap();
    assert_eq!(retrieved.title, "Educated");
    assert_eq!(retrieved.isbn.as_deref(), Some("9780399590504"));
    assert_eq!(retrieved.genres, vec!["Fiction".to_owned()]);
    assert_eq!(retrieved.page_count, Some(320));
    assert!(retrieved.published_date.is_some());
}

#[test]
fn test_get_book_by_isbn_ignores_formatting() {
    let (storage, _temp_dir) = create_test_storage();
    storage.insert_book(&create_test_book("978-0-06-302142-6", "Babel")).unwrap();

    let isbn = Isbn::parse("9780063021426").unwrap();
    let found = storage.get_book_by_isbn(&isbn).unwrap().unwrap();
    assert_eq!(found.title, "Babel");

    let other = Isbn::parse("9780593135204").unwrap();
    assert!(storage.get_book_by_isbn(&other).unwrap().is_none());
}

#[test]
fn test_duplicate_isbn_is_rejected() {
    let (storage, _temp_dir) = create_test_storage();
    storage.insert_book(&create_test_book("978-0-06-302142-6", "Babel")).unwrap();

    let mut again = create_test_book("9780063021426", "Babel, Again");
    again.id = "another-id".to_owned();
    let err = storage.insert_book(&again).unwrap_err();
    assert!(err.is_duplicate(), "expected duplicate, got {err:?}");
}

#[test]
fn test_replace_books_clears_previous_rows() {
    let (storage, _temp_dir) = create_test_storage();
    storage.insert_book(&create_test_book("978-0-06-302142-6", "Babel")).unwrap();

    let books = vec![
        create_test_book("978-0-399-59050-4", "Educated"),
        create_test_book("978-0-593-13520-4", "Project Hail Mary"),
    ];
    let failures = storage.replace_books(&books).unwrap();
    assert!(failures.is_empty());

    let ids = storage.list_book_ids().unwrap();
    assert_eq!(ids, vec![books[0].id.clone(), books[1].id.clone()]);
}

#[test]
fn test_replace_books_isolates_failing_record() {
    let (storage, _temp_dir) = create_test_storage();
    let first = create_test_book("978-0-399-59050-4", "Educated");
    let mut clash = create_test_book("978-0-593-13520-4", "Project Hail Mary");
    clash.id = first.id.clone();
    let last = create_test_book("978-1-9848-0673-4", "Beach Read");

    let failures = storage.replace_books(&[first, clash, last]).unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].index, 1);
    assert!(failures[0].error.is_duplicate());
    assert_eq!(storage.list_book_ids().unwrap().len(), 2);
}

#[test]
fn test_query_books_filters_by_genre_case_insensitively() {
    let (storage, _temp_dir) = create_test_storage();
    let memoir = NewBook::try_from(BookSeed {
        title: "Educated".to_owned(),
        author: "Tara Westover".to_owned(),
        isbn: Some("978-0-399-59050-4".to_owned()),
        genres: vec!["Memoir".to_owned()],
        ..BookSeed::default()
    })
    .unwrap();
    storage.insert_book(&memoir).unwrap();
    storage.insert_book(&create_test_book("978-0-063-02142-6", "Babel")).unwrap();

    let page = storage.query_books(&BookQuery::default().genre("memoir")).unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].title, "Educated");
    assert_eq!(storage.count_books(Some("FICTION")).unwrap(), 1);
    assert_eq!(storage.count_books(None).unwrap(), 2);
}

#[test]
fn test_query_books_sorts_unscored_last_and_paginates() {
    let (storage, _temp_dir) = create_test_storage();
    let a = storage.insert_book(&create_test_book("978-0-399-59050-4", "A")).unwrap();
    let b = storage.insert_book(&create_test_book("978-0-063-02142-6", "B")).unwrap();
    storage.insert_book(&create_test_book("978-0-593-13520-4", "C")).unwrap();
    storage
        .update_book_score(&ScoreSummary {
            book_id: a.id.clone(),
            calculated_critic_score: Some(80.0),
            critic_review_count: 5,
            rated_review_count: 5,
        })
        .unwrap();
    storage
        .update_book_score(&ScoreSummary {
            book_id: b.id.clone(),
            calculated_critic_score: Some(90.5),
            critic_review_count: 5,
            rated_review_count: 5,
        })
        .unwrap();

    let query = BookQuery::default().sort(BookSort::CriticScore);
    let titles: Vec<_> =
        storage.query_books(&query).unwrap().items.into_iter().map(|b| b.title).collect();
    assert_eq!(titles, vec!["B", "A", "C"]);

    let page = storage.query_books(&query.clone().limit(1)).unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.limit, 1);
}

#[test]
fn test_update_score_for_missing_book_is_not_found() {
    let (storage, _temp_dir) = create_test_storage();
    let err = storage
        .update_book_score(&ScoreSummary {
            book_id: "missing".to_owned(),
            calculated_critic_score: None,
            critic_review_count: 0,
            rated_review_count: 0,
        })
        .unwrap_err();
    assert!(err.is_not_found());
}
