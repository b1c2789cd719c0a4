//! Book records: raw seeds, validated inserts, stored rows and read queries.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{CATALOG_ID_NAMESPACE, DEFAULT_QUERY_LIMIT, MAX_QUERY_LIMIT};
use crate::error::CatalogError;
use crate::isbn::Isbn;

/// A stored book row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub genres: Vec<String>,
    pub published_date: Option<NaiveDate>,
    pub page_count: Option<u32>,
    pub summary: Option<String>,
    pub cover_image_url: Option<String>,
    /// Legacy hand-entered score, kept as imported.
    pub critic_score: Option<f64>,
    /// Derived by the score aggregator; `None` until enough rated reviews exist.
    pub calculated_critic_score: Option<f64>,
    /// Derived: number of critic reviews currently owned by this book.
    pub critic_review_count: u32,
    pub created_at: DateTime<Utc>,
}

impl Book {
    /// Whether the book's normalized ISBN equals `isbn`.
    #[must_use]
    pub fn has_isbn(&self, isbn: &Isbn) -> bool {
        self.isbn.as_deref().is_some_and(|raw| isbn.matches_raw(raw))
    }
}

/// Book record as it appears in a seed dataset, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookSeed {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default, alias = "genre")]
    pub genres: Vec<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub page_count: Option<i64>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub critic_score: Option<f64>,
}

impl BookSeed {
    /// Human-readable key used in failure reports.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.isbn {
            Some(isbn) if !self.title.is_empty() => format!("{} ({isbn})", self.title),
            Some(isbn) => isbn.clone(),
            None if self.title.is_empty() => "<untitled>".to_owned(),
            None => self.title.clone(),
        }
    }
}

/// A validated book ready for insertion. Derived score fields are not part of it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: Option<Isbn>,
    pub genres: Vec<String>,
    pub published_date: Option<NaiveDate>,
    pub page_count: Option<u32>,
    pub summary: Option<String>,
    pub cover_image_url: Option<String>,
    pub critic_score: Option<f64>,
}

impl NewBook {
    /// Deterministic id: v5 over the ISBN, or over `title|author` without one.
    #[must_use]
    pub fn derive_id(isbn: Option<&Isbn>, title: &str, author: &str) -> String {
        let name = match isbn {
            Some(isbn) => format!("isbn:{isbn}"),
            None => format!("title:{}|{}", title.trim().to_lowercase(), author.trim().to_lowercase()),
        };
        Uuid::new_v5(&CATALOG_ID_NAMESPACE, name.as_bytes()).to_string()
    }
}

impl TryFrom<BookSeed> for NewBook {
    type Error = CatalogError;

    fn try_from(seed: BookSeed) -> Result<Self, Self::Error> {
        let title = seed.title.trim().to_owned();
        let author = seed.author.trim().to_owned();
        if title.is_empty() {
            return Err(CatalogError::InvalidSeed("book title is empty".to_owned()));
        }
        if author.is_empty() {
            return Err(CatalogError::InvalidSeed(format!("book '{title}' has no author")));
        }
        let isbn = non_blank(seed.isbn).map(|raw| Isbn::parse(&raw)).transpose()?;
        let page_count = seed
            .page_count
            .map(|n| {
                u32::try_from(n).map_err(|_| {
                    CatalogError::InvalidSeed(format!("book '{title}' has page count {n}"))
                })
            })
            .transpose()?;
        let genres: BTreeSet<String> = seed
            .genres
            .into_iter()
            .map(|g| g.trim().to_owned())
            .filter(|g| !g.is_empty())
            .collect();
        let id = non_blank(seed.id)
            .unwrap_or_else(|| Self::derive_id(isbn.as_ref(), &title, &author));

        Ok(Self {
            id,
            title,
            author,
            isbn,
            genres: genres.into_iter().collect(),
            published_date: parse_optional_date(seed.published_date)?,
            page_count,
            summary: non_blank(seed.summary),
            cover_image_url: non_blank(seed.cover_image_url),
            critic_score: seed.critic_score,
        })
    }
}

/// Sort orders offered to catalogue readers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookSort {
    /// Most recently published first.
    #[default]
    Newest,
    /// Highest calculated critic score first; unscored books last.
    CriticScore,
    /// Most recently inserted first.
    CreatedAt,
}

impl BookSort {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::CriticScore => "critic_score",
            Self::CreatedAt => "created_at",
        }
    }
}

impl FromStr for BookSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newest" | "published" => Ok(Self::Newest),
            "critic_score" | "score" => Ok(Self::CriticScore),
            "created_at" | "created" => Ok(Self::CreatedAt),
            other => Err(format!("unknown book sort: {other}")),
        }
    }
}

/// Filter, order and window for a book listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookQuery {
    pub genre: Option<String>,
    pub sort: BookSort,
    pub limit: usize,
    pub offset: usize,
}

impl Default for BookQuery {
    fn default() -> Self {
        Self { genre: None, sort: BookSort::default(), limit: DEFAULT_QUERY_LIMIT, offset: 0 }
    }
}

impl BookQuery {
    #[must_use]
    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    #[must_use]
    pub const fn sort(mut self, sort: BookSort) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Limit capped to [`MAX_QUERY_LIMIT`].
    #[must_use]
    pub fn capped_limit(&self) -> usize {
        self.limit.min(MAX_QUERY_LIMIT)
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

pub(crate) fn parse_optional_date(value: Option<String>) -> Result<Option<NaiveDate>, CatalogError> {
    non_blank(value)
        .map(|v| {
            NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                .map_err(|source| CatalogError::InvalidDate { value: v, source })
        })
        .transpose()
}
