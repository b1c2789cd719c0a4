use std::io;
use std::result::Result as StdResult;

use thiserror::Error;

/// Errors raised while turning raw catalogue data into typed records.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("invalid seed: {0}")]
    InvalidSeed(String),

    #[error("invalid ISBN '{0}'")]
    InvalidIsbn(String),

    #[error("rating {0} outside 0..=100")]
    RatingOutOfRange(f64),

    #[error("invalid date '{value}': {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("dataset error: {0}")]
    Dataset(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = StdResult<T, CatalogError>;
