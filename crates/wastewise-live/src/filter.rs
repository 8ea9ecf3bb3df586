//! Client-side multi-term filter
//!
//! A query is split on whitespace. A record matches when every term occurs,
//! case-insensitively, as a substring of at least one of its searchable
//! fields. The empty query matches everything.

use wastewise_model::Searchable;

/// Parsed filter text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    terms: Vec<String>,
}

impl SearchQuery {
    /// Parse raw user input
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            terms: raw.split_whitespace().map(str::to_lowercase).collect(),
        }
    }

    /// Text as typed
    #[inline]
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Lowercased terms
    #[inline]
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Whether the query has no terms (blank input)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Test one record
    pub fn matches<T: Searchable + ?Sized>(&self, record: &T) -> bool {
        if self.terms.is_empty() {
            return true;
        }
        let fields: Vec<String> = record
            .search_fields()
            .into_iter()
            .map(str::to_lowercase)
            .collect();
        self.terms
            .iter()
            .all(|term| fields.iter().any(|field| field.contains(term.as_str())))
    }

    /// Matching records, in input order
    pub fn filter<T: Searchable + Clone>(&self, records: &[T]) -> Vec<T> {
        if self.terms.is_empty() {
            return records.to_vec();
        }
        records.iter().filter(|r| self.matches(*r)).cloned().collect()
    }
}

/// Filter records by raw query text
pub fn filter_records<T: Searchable + Clone>(records: &[T], text: &str) -> Vec<T> {
    SearchQuery::parse(text).filter(records)
}
