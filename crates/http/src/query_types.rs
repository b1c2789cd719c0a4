//! Request/query types (Deserialize)

use serde::Deserialize;
use shelfscore_core::{BookQuery, BookSort, DEFAULT_QUERY_LIMIT};

use crate::api_error::ApiError;

const fn default_limit() -> usize {
    DEFAULT_QUERY_LIMIT
}

/// `GET /api/books` query string.
#[derive(Debug, Deserialize)]
pub struct BooksQuery {
    pub genre: Option<String>,
    pub sort: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

impl BooksQuery {
    /// Validate into a store query. Blank genre means no filter; the limit
    /// is capped by the store.
    pub fn into_book_query(self) -> Result<BookQuery, ApiError> {
        let sort = match self.sort.as_deref().map(str::trim) {
            None | Some("") => BookSort::default(),
            Some(s) => s.parse::<BookSort>().map_err(ApiError::BadRequest)?,
        };
        let genre = self.genre.map(|g| g.trim().to_owned()).filter(|g| !g.is_empty());
        Ok(BookQuery { genre, sort, limit: self.limit, offset: self.offset })
    }
}
