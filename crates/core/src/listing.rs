//! List-query cleaning
//!
//! Every paginated admin endpoint takes the same loose query shape. Cleaning
//! happens once here so the HTTP layer only ever sees meaningful parameters:
//! blank values are omitted, `page` defaults to 1, `limit` defaults per
//! resource, and free-text search shorter than three characters is dropped.

use chatrizz_domain::constants::{DEFAULT_PAGE, MIN_SEARCH_LENGTH};

/// Free-text search that is long enough to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Trim `raw` and keep it only if it has at least three characters.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (trimmed.chars().count() >= MIN_SEARCH_LENGTH).then(|| Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Cleaned pagination, search and filter parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    search: Option<SearchTerm>,
    filters: Vec<(&'static str, String)>,
    page: u32,
    limit: u32,
    default_limit: u32,
}

impl ListQuery {
    /// Empty query for a resource whose page size is `default_limit`.
    #[must_use]
    pub fn new(default_limit: u32) -> Self {
        Self {
            search: None,
            filters: Vec::new(),
            page: DEFAULT_PAGE,
            limit: default_limit,
            default_limit,
        }
    }

    #[must_use]
    pub fn with_search(mut self, raw: &str) -> Self {
        self.search = SearchTerm::parse(raw);
        self
    }

    /// Page number; zero falls back to the first page.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = if page == 0 { DEFAULT_PAGE } else { page };
        self
    }

    /// Page size; zero falls back to the resource default.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = if limit == 0 { self.default_limit } else { limit };
        self
    }

    /// Set a named filter. Blank values remove it.
    #[must_use]
    pub fn with_filter(mut self, name: &'static str, value: &str) -> Self {
        self.filters.retain(|(existing, _)| *existing != name);
        let value = value.trim();
        if !value.is_empty() {
            self.filters.push((name, value.to_string()));
        }
        self
    }

    /// Like [`with_filter`](Self::with_filter), upper-casing the value.
    #[must_use]
    pub fn with_upper_filter(self, name: &'static str, value: &str) -> Self {
        self.with_filter(name, &value.to_ascii_uppercase())
    }

    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_ref().map(SearchTerm::as_str)
    }

    #[must_use]
    pub fn filter(&self, name: &str) -> Option<&str> {
        self.filters.iter().find(|(key, _)| *key == name).map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Query-string pairs: search, filters in insertion order, page, limit.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 3);
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.as_str().to_string()));
        }
        pairs.extend(self.filters.iter().map(|(name, value)| ((*name).to_string(), value.clone())));
        pairs.push(("page".to_string(), self.page.to_string()));
        pairs.push(("limit".to_string(), self.limit.to_string()));
        pairs
    }
}
