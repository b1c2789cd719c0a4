//! Shared constants for shelfscore.

use uuid::Uuid;

/// Minimum number of rated critic reviews before a book shows a critic score.
pub const MIN_RATED_REVIEWS_FOR_SCORE: usize = 5;

/// Upper bound of the critic rating scale (lower bound is zero).
pub const MAX_RATING: f64 = 100.0;

/// Default pause between successive book inserts in sequential ingestion.
pub const DEFAULT_INGEST_PACING_MS: u64 = 100;

/// Maximum number of results for any query (DoS protection).
pub const MAX_QUERY_LIMIT: usize = 1000;

/// Default number of results when limit is not specified by the caller.
pub const DEFAULT_QUERY_LIMIT: usize = 20;

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 10;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Namespace for deterministic (v5) book and review identifiers.
pub const CATALOG_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2d3e_8a4b_4c5d_9e0f_1a2b_3c4d_5e6f);
