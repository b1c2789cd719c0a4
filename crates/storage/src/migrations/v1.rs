//! Migration v1: Initial catalogue schema

pub(super) const SQL: &str = "
CREATE TABLE IF NOT EXISTS books (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    author TEXT NOT NULL,
    isbn TEXT,
    isbn_normalized TEXT,
    genres TEXT NOT NULL DEFAULT '[]',
    published_date TEXT,
    page_count INTEGER,
    summary TEXT,
    cover_image_url TEXT,
    critic_score REAL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS critic_reviews (
    id TEXT PRIMARY KEY,
    book_id TEXT NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    isbn TEXT NOT NULL,
    quote TEXT NOT NULL,
    critic_name TEXT NOT NULL,
    publication TEXT NOT NULL,
    review_url TEXT,
    rating REAL CHECK (rating IS NULL OR (rating >= 0 AND rating <= 100)),
    review_date TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_books_isbn ON books(isbn_normalized)
    WHERE isbn_normalized IS NOT NULL;
CREATE INDEX IF NOT EXISTS idx_reviews_book ON critic_reviews(book_id);
";
