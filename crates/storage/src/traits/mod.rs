//! Storage backend trait abstraction
//!
//! Async domain traits over the `books` and `critic_reviews` tables. Both the
//! SQLite and the PostgreSQL backend implement all of them.

pub mod book;
pub mod review;
pub mod score;
pub mod stats;

pub use book::BookStore;
pub use review::CriticReviewStore;
pub use score::ScoreProcedure;
pub use stats::StatsStore;

/// Everything the services need from a backend.
pub trait CatalogStore: BookStore + CriticReviewStore + ScoreProcedure + StatsStore {}

impl<T> CatalogStore for T where T: BookStore + CriticReviewStore + ScoreProcedure + StatsStore {}
