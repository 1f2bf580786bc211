//! Types for the torrent search system.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Query parameters for a torrent search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text search query.
    pub query: String,
    /// Optional: restrict to a content category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<SearchCategory>,
}

impl SearchQuery {
    pub fn anime(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            category: Some(SearchCategory::Anime),
        }
    }
}

/// Content category for filtering search results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SearchCategory {
    Anime,
    Movies,
    Tv,
    Other,
}

/// Raw result from an index, before deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTorrentResult {
    /// Release name as listed by the index.
    pub name: String,
    pub magnet_uri: String,
    pub seeders: u32,
    /// Human readable size ("1.4 GiB").
    pub size_label: String,
}

/// A deduplicated torrent, keyed by its info hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentRecord {
    pub name: String,
    pub magnet_uri: String,
    /// Lower-case info hash taken from the magnet's `btih:` component.
    pub info_hash: String,
    pub seeders: u32,
    pub size_label: String,
}

/// Errors that can occur during search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search backend connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Search backend API error: {0}")]
    ApiError(String),

    #[error("Failed to parse search response: {0}")]
    ParseError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Search backend not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SearchError::Timeout
        } else if e.is_connect() {
            SearchError::ConnectionFailed(e.to_string())
        } else {
            SearchError::ApiError(e.to_string())
        }
    }
}

/// Trait for torrent search backends.
#[async_trait]
pub trait Searcher: Send + Sync {
    /// Backend name for logging/metrics.
    fn name(&self) -> &str;

    /// Run a single query against the index.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawTorrentResult>, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_minimal() {
        let json = r#"{"query": "minimal"}"#;
        let parsed: SearchQuery = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.query, "minimal");
        assert!(parsed.category.is_none());
    }

    #[test]
    fn test_search_category_serialization() {
        assert_eq!(
            serde_json::to_string(&SearchCategory::Anime).unwrap(),
            "\"anime\""
        );
        assert_eq!(
            serde_json::to_string(&SearchQuery::anime("x")).unwrap(),
            r#"{"query":"x","category":"anime"}"#
        );
    }
}
