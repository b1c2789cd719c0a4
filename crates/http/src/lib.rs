//! HTTP API server for shelfscore.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(clippy::absolute_paths, reason = "Explicit paths for clarity")]
#![allow(missing_copy_implementations, reason = "Types may grow")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short closure params are idiomatic")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]
#![allow(clippy::single_call_fn, reason = "Helper functions improve readability")]

pub mod api_error;
mod handlers;
mod query_types;
mod response_types;

use axum::{
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use shelfscore_core::Dataset;
use shelfscore_service::{CatalogService, IngestConfig, IngestionService, ScoreService};
use shelfscore_storage::StorageBackend;

pub use query_types::BooksQuery;
pub use response_types::{CombinedIngestResponse, IngestResponse, VersionResponse};

/// Shared application state for all HTTP handlers.
pub struct AppState {
    /// Ingestion runs against the dataset chosen at startup
    pub ingestion: Arc<IngestionService>,
    /// Single-book score recomputation
    pub scores: ScoreService,
    /// Catalogue reads
    pub catalog: Arc<CatalogService>,
}

impl AppState {
    pub fn new(storage: Arc<StorageBackend>, dataset: Arc<Dataset>, config: IngestConfig) -> Self {
        let scores = ScoreService::new(Arc::clone(&storage), config.score_mode);
        let catalog = Arc::new(CatalogService::new(Arc::clone(&storage)));
        let ingestion = Arc::new(IngestionService::new(storage, dataset, config));
        Self { ingestion, scores, catalog }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/version", get(version))
        .route("/api/ingest/books", post(handlers::ingest::ingest_books))
        .route("/api/ingest/reviews", post(handlers::ingest::ingest_reviews))
        .route("/api/ingest/all", post(handlers::ingest::ingest_all))
        .route("/api/books", get(handlers::books::list_books))
        .route("/api/books/{id}", get(handlers::books::get_book))
        .route("/api/books/{id}/reviews", get(handlers::books::get_book_reviews))
        .route("/api/books/{id}/score", post(handlers::books::recompute_score))
        .route("/api/stats", get(handlers::stats::get_stats))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { version: env!("CARGO_PKG_VERSION").to_owned() })
}
