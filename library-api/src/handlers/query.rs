//! Query parameters for the author and book collections
//!
//! Everything arrives as optional camelCase query-string values; the
//! accessors apply defaults and limits so the rest of the pipeline never
//! sees a missing or out-of-range value.
//!
//! # Example
//!
//! ```rust
//! use library_api::config::PaginationConfig;
//! use library_api::handlers::AuthorsQuery;
//!
//! let query = AuthorsQuery::new()
//!     .with_page_number(2)
//!     .with_page_size(50)
//!     .with_order_by("Genre desc");
//!
//! assert_eq!(query.page_number(), 2);
//! assert_eq!(query.page_size_within(&PaginationConfig::default()), 20);
//! assert_eq!(query.order_by(), "Genre desc");
//! assert_eq!(query.fields(), "");
//! ```

use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;
use crate::links::PageParams;

/// Sort expression used when an authors request does not name one
pub const DEFAULT_ORDER_BY: &str = "Name";

/// Sort expression used when a books request does not name one
pub const DEFAULT_BOOK_ORDER_BY: &str = "Title";

/// Query parameters for listing authors
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthorsQuery {
    /// Page number (1-indexed). None defaults to 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,

    /// Items per page. None defaults to the configured page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    /// Exact genre to keep
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,

    /// Free-text search over genre and names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,

    /// Comma-separated sort clauses, e.g. `"Age desc, Name"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,

    /// Comma-separated field selection for shaping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
}

impl AuthorsQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_page_number(mut self, page_number: u32) -> Self {
        self.page_number = Some(page_number);
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    #[must_use]
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    #[must_use]
    pub fn with_search_query(mut self, search_query: impl Into<String>) -> Self {
        self.search_query = Some(search_query.into());
        self
    }

    #[must_use]
    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    /// 1-indexed page number; 0 is treated as 1
    #[must_use]
    pub fn page_number(&self) -> u32 {
        self.page_number.unwrap_or(1).max(1)
    }

    /// Page size between 1 and `limits.max_page_size`, defaulting to
    /// `limits.default_page_size`
    #[must_use]
    pub fn page_size_within(&self, limits: &PaginationConfig) -> u32 {
        let max = limits.max_page_size.max(1);
        self.page_size
            .unwrap_or(limits.default_page_size)
            .clamp(1, max)
    }

    /// Sort expression, defaulting to [`DEFAULT_ORDER_BY`]
    #[must_use]
    pub fn order_by(&self) -> &str {
        self.order_by.as_deref().unwrap_or(DEFAULT_ORDER_BY)
    }

    /// Requested fields; empty means all
    #[must_use]
    pub fn fields(&self) -> &str {
        self.fields.as_deref().unwrap_or_default()
    }

    /// Genre filter, if a non-blank one was given
    #[must_use]
    pub fn genre(&self) -> Option<&str> {
        non_blank(self.genre.as_deref())
    }

    /// Search text, if a non-blank one was given
    #[must_use]
    pub fn search_query(&self) -> Option<&str> {
        non_blank(self.search_query.as_deref())
    }

    /// Copy with the page size fixed to the value actually served
    #[must_use]
    pub fn normalized(&self, limits: &PaginationConfig) -> Self {
        let mut query = self.clone();
        query.page_number = Some(self.page_number());
        query.page_size = Some(self.page_size_within(limits));
        query
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Expects a [`normalized`](AuthorsQuery::normalized) query: the stored page
/// size is emitted as-is so links repeat the size that was served.
impl PageParams for AuthorsQuery {
    fn page_params(&self, page_number: u32) -> Vec<(&'static str, String)> {
        let page_size = self
            .page_size
            .unwrap_or(PaginationConfig::default().default_page_size)
            .max(1);

        let mut params = Vec::with_capacity(6);
        if !self.fields().is_empty() {
            params.push(("fields", self.fields().to_string()));
        }
        params.push(("orderBy", self.order_by().to_string()));
        if let Some(search) = self.search_query() {
            params.push(("searchQuery", search.to_string()));
        }
        if let Some(genre) = self.genre() {
            params.push(("genre", genre.to_string()));
        }
        params.push(("pageNumber", page_number.to_string()));
        params.push(("pageSize", page_size.to_string()));
        params
    }
}

/// Query parameters for listing an author's books
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BooksQuery {
    /// Comma-separated sort clauses, e.g. `"Title desc"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,

    /// Comma-separated field selection for shaping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
}

impl BooksQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    /// Sort expression, defaulting to [`DEFAULT_BOOK_ORDER_BY`]
    #[must_use]
    pub fn order_by(&self) -> &str {
        self.order_by.as_deref().unwrap_or(DEFAULT_BOOK_ORDER_BY)
    }

    #[must_use]
    pub fn fields(&self) -> &str {
        self.fields.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_size(query: &AuthorsQuery) -> u32 {
        query.page_size_within(&PaginationConfig::default())
    }

    #[test]
    fn test_defaults() {
        let query = AuthorsQuery::new();
        assert_eq!(query.page_number(), 1);
        assert_eq!(page_size(&query), 10);
        assert_eq!(query.order_by(), "Name");
        assert_eq!(query.fields(), "");
        assert!(query.genre().is_none());
        assert!(query.search_query().is_none());
    }

    #[test]
    fn test_page_number_zero_protection() {
        assert_eq!(AuthorsQuery::new().with_page_number(0).page_number(), 1);
    }

    #[test]
    fn test_page_size_is_clamped_to_max() {
        assert_eq!(page_size(&AuthorsQuery::new().with_page_size(50)), 20);
        assert_eq!(page_size(&AuthorsQuery::new().with_page_size(0)), 1);
        assert_eq!(page_size(&AuthorsQuery::new().with_page_size(15)), 15);
    }

    #[test]
    fn test_page_size_within_custom_limits() {
        let limits = PaginationConfig {
            default_page_size: 5,
            max_page_size: 8,
        };
        assert_eq!(AuthorsQuery::new().page_size_within(&limits), 5);
        assert_eq!(AuthorsQuery::new().with_page_size(9).page_size_within(&limits), 8);
    }

    #[test]
    fn test_blank_filters_are_ignored() {
        let query = AuthorsQuery::new().with_genre("  ").with_search_query("");
        assert!(query.genre().is_none());
        assert!(query.search_query().is_none());
    }

    #[test]
    fn test_deserializes_camel_case() {
        let query: AuthorsQuery = serde_json::from_str(
            r#"{"pageNumber":3,"pageSize":5,"searchQuery":"king","orderBy":"Age desc","fields":"id,name"}"#,
        )
        .unwrap();
        assert_eq!(query.page_number(), 3);
        assert_eq!(page_size(&query), 5);
        assert_eq!(query.search_query(), Some("king"));
        assert_eq!(query.order_by(), "Age desc");
        assert_eq!(query.fields(), "id,name");
    }

    #[test]
    fn test_page_params_carry_filters() {
        let query = AuthorsQuery::new()
            .with_fields("id,name")
            .with_genre("Fantasy")
            .with_page_size(5);
        let params = query.page_params(4);
        assert_eq!(
            params,
            vec![
                ("fields", "id,name".to_string()),
                ("orderBy", "Name".to_string()),
                ("genre", "Fantasy".to_string()),
                ("pageNumber", "4".to_string()),
                ("pageSize", "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_normalized_fixes_paging() {
        let query = AuthorsQuery::new().with_page_size(99).normalized(&PaginationConfig::default());
        assert_eq!(query.page_size, Some(20));
        assert_eq!(query.page_number, Some(1));
    }

    #[test]
    fn test_page_params_keep_size_above_default_max() {
        let limits = PaginationConfig {
            default_page_size: 10,
            max_page_size: 50,
        };
        let query = AuthorsQuery::new().with_page_size(30).normalized(&limits);
        let params = query.page_params(2);
        assert_eq!(params.last(), Some(&("pageSize", "30".to_string())));
    }

    #[test]
    fn test_books_query_defaults_to_title() {
        let query = BooksQuery::new();
        assert_eq!(query.order_by(), "Title");
        assert_eq!(query.fields(), "");

        let query: BooksQuery =
            serde_json::from_str(r#"{"orderBy":"Description desc","fields":"title"}"#).unwrap();
        assert_eq!(query.order_by(), "Description desc");
        assert_eq!(query.fields(), "title");
    }
}
