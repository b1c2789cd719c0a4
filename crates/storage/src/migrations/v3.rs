//! Migration v3: listing indexes

pub(super) const SQL: &str = "
CREATE INDEX IF NOT EXISTS idx_books_published ON books(published_date DESC);
CREATE INDEX IF NOT EXISTS idx_books_score ON books(calculated_critic_score DESC);
CREATE INDEX IF NOT EXISTS idx_books_created ON books(created_at DESC);
CREATE INDEX IF NOT EXISTS idx_reviews_date ON critic_reviews(book_id, review_date DESC);
";
