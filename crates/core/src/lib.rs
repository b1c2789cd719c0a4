//! Core types and rules for shelfscore
//!
//! This crate contains the domain types shared across all other crates,
//! together with the two pure rules the rest of the system is built around:
//! review-to-book matching and critic-score aggregation.

mod book;
mod constants;
mod dataset;
mod env_config;
mod error;
mod ingest;
mod isbn;
mod matcher;
mod review;
mod score;

pub use book::*;
pub use constants::*;
pub use dataset::*;
pub use env_config::*;
pub use error::*;
pub use ingest::*;
pub use isbn::*;
pub use matcher::*;
pub use review::*;
pub use score::*;
