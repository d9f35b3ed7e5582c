//! Cursor-based pagination contract for list endpoints.
//!
//! Every paged collection the backend exposes follows the same shape: a
//! data array plus a `hasMore`/`nextCursor` pair. The cursor is opaque to
//! the client.

use serde::{Deserialize, Serialize};

/// Default page size for list fetches.
const DEFAULT_LIMIT: u32 = 20;
/// Maximum page size accepted by the backend.
const MAX_LIMIT: u32 = 100;

/// Query parameters for a cursor-paginated fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CursorQuery {
    /// Opaque cursor returned by a previous page, if any.
    pub cursor: Option<String>,
    /// Page size.
    pub limit: Option<u32>,
}

impl CursorQuery {
    /// Create a query for the first page with the default limit.
    pub fn first_page() -> Self {
        Self::default()
    }

    /// Create a query continuing from the given cursor.
    pub fn after(cursor: impl Into<String>) -> Self {
        Self {
            cursor: Some(cursor.into()),
            limit: None,
        }
    }

    /// Override the page size (clamped to the backend maximum).
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit.clamp(1, MAX_LIMIT));
        self
    }

    /// Render as query-string pairs.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(2);
        pairs.push((
            "limit".to_string(),
            self.limit.unwrap_or(DEFAULT_LIMIT).to_string(),
        ));
        if let Some(cursor) = &self.cursor {
            pairs.push(("cursor".to_string(), cursor.clone()));
        }
        pairs
    }
}

/// Pagination metadata attached to every paged response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether more items exist past this page.
    pub has_more: bool,
    /// Cursor for the next page, absent on the last page.
    pub next_cursor: Option<String>,
}

/// A single page of a paged collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items on this page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub pagination: PageInfo,
}

impl<T> Page<T> {
    /// Cursor to request the next page, if any.
    pub fn next_cursor(&self) -> Option<&str> {
        if self.pagination.has_more {
            self.pagination.next_cursor.as_deref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_default_limit() {
        let pairs = CursorQuery::first_page().to_query_pairs();
        assert_eq!(pairs, vec![("limit".to_string(), "20".to_string())]);
    }

    #[test]
    fn test_query_pairs_with_cursor() {
        let pairs = CursorQuery::after("abc").with_limit(500).to_query_pairs();
        assert_eq!(pairs[0], ("limit".to_string(), "100".to_string()));
        assert_eq!(pairs[1], ("cursor".to_string(), "abc".to_string()));
    }

    #[test]
    fn test_page_next_cursor_only_when_more() {
        let page: Page<u32> = Page {
            data: vec![1, 2],
            pagination: PageInfo {
                has_more: false,
                next_cursor: Some("stale".to_string()),
            },
        };
        assert_eq!(page.next_cursor(), None);
    }

    #[test]
    fn test_page_deserializes_camel_case() {
        let json = r#"{"data":[1],"pagination":{"hasMore":true,"nextCursor":"c1"}}"#;
        let page: Page<u32> = serde_json::from_str(json).expect("deserialize");
        assert!(page.pagination.has_more);
        assert_eq!(page.next_cursor(), Some("c1"));
    }
}
