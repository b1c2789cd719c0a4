//! Service layer for shelfscore
//!
//! Centralizes business logic between the HTTP/CLI surfaces and storage:
//! ingestion runs, critic-score aggregation and catalogue reads.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Internal types")]

mod catalog_service;
mod config;
mod error;
mod ingestion_service;
mod score_service;
#[cfg(test)]
mod test_support;

pub use catalog_service::CatalogService;
pub use config::{IngestConfig, IngestMode, ScoreMode};
pub use error::ServiceError;
pub use ingestion_service::{CombinedReport, IngestionService};
pub use score_service::{ScoreBatch, ScoreService};
