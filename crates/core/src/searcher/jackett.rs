//! Jackett search backend implementation.

use std::time::Duration;

use async_trait::async_trait;
use bytesize::ByteSize;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::JackettConfig;

use super::magnet::build_magnet;
use super::{RawTorrentResult, SearchCategory, SearchError, SearchQuery, Searcher};

/// Jackett search backend implementation.
pub struct JackettSearcher {
    client: Client,
    config: JackettConfig,
}

impl JackettSearcher {
    /// Create a new JackettSearcher with the given configuration.
    pub fn new(config: JackettConfig) -> Result<Self, SearchError> {
        if config.api_key.is_empty() {
            return Err(SearchError::NotConfigured(
                "Jackett API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self { client, config })
    }

    /// Build the Jackett API URL for a search.
    fn build_search_url(&self, query: &SearchQuery) -> String {
        let mut url = format!(
            "{}/api/v2.0/indexers/{}/results?apikey={}&Query={}",
            self.config.url.trim_end_matches('/'),
            urlencoding::encode(&self.config.indexer),
            urlencoding::encode(&self.config.api_key),
            urlencoding::encode(&query.query)
        );

        if let Some(category) = &query.category {
            for cat_id in category_to_jackett_ids(category) {
                url.push_str(&format!("&Category[]={}", cat_id));
            }
        }

        url
    }
}

#[async_trait]
impl Searcher for JackettSearcher {
    fn name(&self) -> &str {
        "jackett"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawTorrentResult>, SearchError> {
        let url = self.build_search_url(query);
        debug!(indexer = %self.config.indexer, query = %query.query, "Searching Jackett");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let jackett_response: JackettResponse = response
            .json()
            .await
            .map_err(|e| SearchError::ParseError(e.to_string()))?;

        debug!(
            query = %query.query,
            results = jackett_response.Results.len(),
            "Jackett search complete"
        );

        Ok(jackett_response
            .Results
            .into_iter()
            .filter_map(RawTorrentResult::from_jackett)
            .collect())
    }
}

/// Map our categories to Jackett/Torznab category IDs.
fn category_to_jackett_ids(category: &SearchCategory) -> &'static [u32] {
    match category {
        SearchCategory::Anime => &[5070],
        SearchCategory::Movies => &[2000],
        SearchCategory::Tv => &[5000],
        SearchCategory::Other => &[],
    }
}

// ============================================================================
// Jackett API response types
// ============================================================================

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct JackettResponse {
    Results: Vec<JackettResult>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct JackettResult {
    Title: String,
    MagnetUri: Option<String>,
    InfoHash: Option<String>,
    Size: Option<i64>,
    Seeders: Option<i32>,
}

impl RawTorrentResult {
    /// Results without a magnet or an info hash cannot be streamed and are skipped.
    fn from_jackett(r: JackettResult) -> Option<Self> {
        let magnet_uri = match (r.MagnetUri, r.InfoHash) {
            (Some(magnet), _) if magnet.starts_with("magnet:") => magnet,
            (_, Some(hash)) if !hash.is_empty() => build_magnet(&hash, &r.Title, &[]),
            _ => return None,
        };

        Some(Self {
            name: r.Title,
            magnet_uri,
            seeders: r.Seeders.unwrap_or(0).max(0) as u32,
            size_label: ByteSize::b(r.Size.unwrap_or(0).max(0) as u64).to_string(),
        })
    }
}
