//! ISBN normalization and validation.
//!
//! Seeds and stored rows carry ISBNs in whatever form they were typed in
//! (`978-0-399-59050-4`, `0 399 59050 X`). Matching always happens on the
//! normalized form: hyphens and whitespace removed, trailing check digit `x`
//! upper-cased.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

#[allow(clippy::unwrap_used, reason = "static pattern is valid")]
static ISBN_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d{13}|\d{9}[\dX])$").unwrap());

/// Strip hyphens and whitespace; upper-case an `x` check digit.
#[must_use]
pub fn normalize_isbn(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// A normalized, well-formed ISBN-10 or ISBN-13.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isbn(String);

impl Isbn {
    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        let normalized = normalize_isbn(raw);
        if ISBN_SHAPE.is_match(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(CatalogError::InvalidIsbn(raw.to_owned()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against a raw (possibly un-normalized) ISBN string.
    #[must_use]
    pub fn matches_raw(&self, raw: &str) -> bool {
        normalize_isbn(raw) == self.0
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Isbn {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Isbn> for String {
    fn from(value: Isbn) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_hyphens_and_spaces() {
        assert_eq!(normalize_isbn("978-0-399-59050-4"), "9780399590504");
        assert_eq!(normalize_isbn(" 978 0399 590504 "), "9780399590504");
    }

    #[test]
    fn normalize_uppercases_check_digit() {
        assert_eq!(normalize_isbn("0-8044-2957-x"), "080442957X");
    }

    #[test]
    fn parse_accepts_isbn10_and_isbn13() {
        assert!(Isbn::parse("9780399590504").is_ok());
        assert!(Isbn::parse("0-8044-2957-X").is_ok());
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(matches!(Isbn::parse("12345"), Err(CatalogError::InvalidIsbn(_))));
        assert!(Isbn::parse("97803995905X4").is_err());
        assert!(Isbn::parse("").is_err());
    }

    #[test]
    fn matches_raw_ignores_formatting() {
        let isbn = Isbn::parse("9780399590504").unwrap();
        assert!(isbn.matches_raw("978-0-399-59050-4"));
        assert!(!isbn.matches_raw("9780593600863"));
    }

    #[test]
    fn deserializes_through_validation() {
        let ok: Isbn = serde_json::from_str("\"978-0-399-59050-4\"").unwrap();
        assert_eq!(ok.as_str(), "9780399590504");
        assert!(serde_json::from_str::<Isbn>("\"not-an-isbn\"").is_err());
    }
}
