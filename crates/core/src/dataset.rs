//! Seed datasets for ingestion.
//!
//! A dataset is plain JSON: `{ "books": [BookSeed], "reviews": [ReviewSeed] }`.
//! The catalogue shipped with the crate is embedded at compile time; any other
//! file with the same shape can be loaded instead.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::book::BookSeed;
use crate::error::CatalogError;
use crate::review::ReviewSeed;

const EMBEDDED_DATASET: &str = include_str!("../data/seed.json");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub books: Vec<BookSeed>,
    #[serde(default)]
    pub reviews: Vec<ReviewSeed>,
}

impl Dataset {
    /// The catalogue bundled with this build.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_DATASET)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let dataset = Self::from_json(&raw)?;
        tracing::info!(
            path = %path.display(),
            books = dataset.books.len(),
            reviews = dataset.reviews.len(),
            "Loaded seed dataset"
        );
        Ok(dataset)
    }

    /// Load from `path` when given, otherwise fall back to the embedded catalogue.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::embedded(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::NewBook;
    use crate::review::ReviewCandidate;

    #[test]
    fn embedded_dataset_parses_and_validates() {
        let dataset = Dataset::embedded().unwrap();
        assert_eq!(dataset.books.len(), 6);
        assert_eq!(dataset.reviews.len(), 29);
        for seed in dataset.books {
            NewBook::try_from(seed).unwrap();
        }
        for seed in dataset.reviews {
            ReviewCandidate::try_from(seed).unwrap();
        }
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let dataset = Dataset::from_json(r#"{"books": []}"#).unwrap();
        assert!(dataset.reviews.is_empty());
    }

    #[test]
    fn malformed_json_is_a_dataset_error() {
        assert!(matches!(Dataset::from_json("{"), Err(CatalogError::Dataset(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Dataset::load(Some(Path::new("/nonexistent/shelfscore.json"))).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
