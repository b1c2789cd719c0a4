#![allow(
    clippy::redundant_pub_crate,
    reason = "migrations module is private, pub(crate) is intentional"
)]

mod column_helpers;
mod v1;
mod v2;
mod v3;

use column_helpers::add_column_if_not_exists;
use rusqlite::Connection;

pub const SCHEMA_VERSION: i32 = 3;

pub fn run_migrations(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "busy_timeout", 5000i32)?;

    let current_version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    tracing::info!("Database schema version: {} (target: {})", current_version, SCHEMA_VERSION);

    if current_version < 1i32 {
        tracing::info!("Running migration v1: books and critic_reviews tables");
        conn.execute_batch(v1::SQL)?;
    }

    if current_version < 2i32 {
        tracing::info!("Running migration v2: derived critic score columns");
        add_column_if_not_exists(conn, "books", v2::CALCULATED_SCORE, v2::CALCULATED_SCORE_DEF)?;
        add_column_if_not_exists(conn, "books", v2::REVIEW_COUNT, v2::REVIEW_COUNT_DEF)?;
    }

    if current_version < 3i32 {
        tracing::info!("Running migration v3: listing indexes");
        conn.execute_batch(v3::SQL)?;
    }

    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tracing::info!("Database schema up to date (version {})", SCHEMA_VERSION);

    Ok(())
}
