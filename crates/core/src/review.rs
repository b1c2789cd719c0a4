//! Critic review records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::book::{non_blank, parse_optional_date, Book};
use crate::constants::{CATALOG_ID_NAMESPACE, MAX_RATING};
use crate::error::CatalogError;
use crate::isbn::Isbn;

/// A stored critic review row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticReview {
    pub id: String,
    pub book_id: String,
    pub isbn: String,
    pub quote: String,
    pub critic_name: String,
    pub publication: String,
    pub review_url: Option<String>,
    /// 0-100 when present.
    pub rating: Option<f64>,
    pub review_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Critic review as it appears in a seed dataset, before validation.
///
/// `expected_title` is the title the curator believed the ISBN belongs to.
/// It is checked against the book the ISBN resolves to and never stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewSeed {
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub expected_title: Option<String>,
    #[serde(default)]
    pub quote: String,
    #[serde(default)]
    pub critic_name: String,
    #[serde(default)]
    pub publication: String,
    #[serde(default)]
    pub review_url: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_date: Option<String>,
}

impl ReviewSeed {
    /// Human-readable key used in failure reports.
    #[must_use]
    pub fn label(&self) -> String {
        let isbn = self.isbn.as_deref().unwrap_or("<no isbn>");
        format!("{isbn} / {} ({})", self.critic_name, self.publication)
    }
}

/// A validated review that has not yet been matched to a book.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewCandidate {
    pub isbn: Isbn,
    pub expected_title: Option<String>,
    pub quote: String,
    pub critic_name: String,
    pub publication: String,
    pub review_url: Option<String>,
    pub rating: Option<f64>,
    pub review_date: Option<NaiveDate>,
}

impl ReviewCandidate {
    /// Bind this candidate to the book it was matched against.
    #[must_use]
    pub fn attach(self, book: &Book) -> NewCriticReview {
        let id = NewCriticReview::derive_id(&book.id, &self.critic_name, &self.publication, &self.quote);
        NewCriticReview {
            id,
            book_id: book.id.clone(),
            isbn: self.isbn,
            quote: self.quote,
            critic_name: self.critic_name,
            publication: self.publication,
            review_url: self.review_url,
            rating: self.rating,
            review_date: self.review_date,
        }
    }
}

impl TryFrom<ReviewSeed> for ReviewCandidate {
    type Error = CatalogError;

    fn try_from(seed: ReviewSeed) -> Result<Self, Self::Error> {
        let isbn_raw = non_blank(seed.isbn)
            .ok_or_else(|| CatalogError::InvalidSeed("review has no ISBN".to_owned()))?;
        let isbn = Isbn::parse(&isbn_raw)?;
        let quote = required(seed.quote, "quote")?;
        let critic_name = required(seed.critic_name, "critic name")?;
        let publication = required(seed.publication, "publication")?;
        if let Some(rating) = seed.rating
            && !(0.0..=MAX_RATING).contains(&rating)
        {
            return Err(CatalogError::RatingOutOfRange(rating));
        }
        Ok(Self {
            isbn,
            // Compared exactly; only absence is normalized.
            expected_title: seed.expected_title.filter(|t| !t.is_empty()),
            quote,
            critic_name,
            publication,
            review_url: non_blank(seed.review_url),
            rating: seed.rating,
            review_date: parse_optional_date(seed.review_date)?,
        })
    }
}

/// A matched review ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCriticReview {
    pub id: String,
    pub book_id: String,
    pub isbn: Isbn,
    pub quote: String,
    pub critic_name: String,
    pub publication: String,
    pub review_url: Option<String>,
    pub rating: Option<f64>,
    pub review_date: Option<NaiveDate>,
}

impl NewCriticReview {
    #[must_use]
    pub fn derive_id(book_id: &str, critic_name: &str, publication: &str, quote: &str) -> String {
        let name = format!("review:{book_id}|{critic_name}|{publication}|{quote}");
        Uuid::new_v5(&CATALOG_ID_NAMESPACE, name.as_bytes()).to_string()
    }
}

fn required(value: String, field: &str) -> Result<String, CatalogError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CatalogError::InvalidSeed(format!("review {field} is empty")))
    } else {
        Ok(trimmed.to_owned())
    }
}
