//! PostgreSQL schema migrations for the shelfscore catalogue.

use sqlx::PgPool;

use crate::error::StorageError;

/// Recomputes and persists one book's derived score fields.
///
/// Raises SQLSTATE `P0002` for an unknown book. `COUNT(rating)` and
/// `AVG(rating)` skip unrated reviews.
const RECOMPUTE_FUNCTION: &str = r#"
CREATE OR REPLACE FUNCTION recompute_critic_score(p_book_id TEXT, p_min_rated INTEGER DEFAULT 5)
RETURNS TABLE(review_count INTEGER, rated_count INTEGER, score DOUBLE PRECISION)
LANGUAGE plpgsql AS $$
DECLARE
    v_total INTEGER;
    v_rated INTEGER;
    v_avg DOUBLE PRECISION;
BEGIN
    PERFORM 1 FROM books WHERE id = p_book_id FOR UPDATE;
    IF NOT FOUND THEN
        RAISE EXCEPTION 'book % not found', p_book_id USING ERRCODE = 'P0002';
    END IF;

    SELECT COUNT(*), COUNT(r.rating), AVG(r.rating)
      INTO v_total, v_rated, v_avg
      FROM critic_reviews r
     WHERE r.book_id = p_book_id;

    IF v_rated < p_min_rated THEN
        v_avg := NULL;
    END IF;

    UPDATE books
       SET calculated_critic_score = v_avg,
           critic_review_count = v_total
     WHERE id = p_book_id;

    RETURN QUERY SELECT v_total, v_rated, v_avg;
END;
$$
"#;

/// Run all PostgreSQL migrations.
pub async fn run_pg_migrations(pool: &PgPool) -> Result<(), StorageError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            isbn TEXT UNIQUE,
            genres TEXT[] NOT NULL DEFAULT '{}',
            published_date DATE,
            page_count INTEGER CHECK (page_count IS NULL OR page_count >= 0),
            summary TEXT,
            cover_image_url TEXT,
            critic_score DOUBLE PRECISION,
            calculated_critic_score DOUBLE PRECISION,
            critic_review_count INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS critic_reviews (
            id TEXT PRIMARY KEY,
            book_id TEXT NOT NULL REFERENCES books(id) ON DELETE CASCADE,
            isbn TEXT NOT NULL,
            quote TEXT NOT NULL,
            critic_name TEXT NOT NULL,
            publication TEXT NOT NULL,
            review_url TEXT,
            rating DOUBLE PRECISION CHECK (rating IS NULL OR (rating >= 0 AND rating <= 100)),
            review_date DATE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_book ON critic_reviews (book_id, review_date DESC)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_books_genres ON books USING GIN (genres)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_books_published ON books (published_date DESC)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_books_score ON books (calculated_critic_score DESC)")
        .execute(pool)
        .await?;

    sqlx::query(RECOMPUTE_FUNCTION).execute(pool).await?;

    tracing::info!("PostgreSQL migrations complete");
    Ok(())
}
