//! Cinemeta client for canonical IMDb titles.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::media::MediaKind;

use super::types::{parse_year, CanonicalTitle};
use super::{CanonicalTitleSource, MetadataError};

/// Cinemeta client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CinemetaConfig {
    /// Base URL (default: https://v3-cinemeta.strem.io).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u32,
}

fn default_base_url() -> String {
    "https://v3-cinemeta.strem.io".to_string()
}

fn default_timeout_secs() -> u32 {
    10
}

impl Default for CinemetaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Cinemeta API client.
pub struct CinemetaClient {
    client: Client,
    base_url: String,
}

impl CinemetaClient {
    pub fn new(config: CinemetaConfig) -> Result<Self, MetadataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CanonicalTitleSource for CinemetaClient {
    fn name(&self) -> &str {
        "cinemeta"
    }

    async fn canonical_title(
        &self,
        kind: MediaKind,
        imdb_id: &str,
    ) -> Result<Option<CanonicalTitle>, MetadataError> {
        let url = format!("{}/meta/{}/{}.json", self.base_url, kind, imdb_id);
        debug!(%kind, imdb_id, "Cinemeta lookup");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == 404 {
            return Ok(None);
        }
        if status == 429 {
            warn!("Cinemeta rate limit exceeded");
            return Err(MetadataError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MetadataError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: CinemetaResponse = response.json().await.map_err(|e| {
            MetadataError::ParseError(format!("Failed to parse Cinemeta response: {}", e))
        })?;

        Ok(body.meta.and_then(CinemetaMeta::into_canonical))
    }
}

// ============================================================================
// Cinemeta API response types (internal)
// ============================================================================

#[derive(Debug, Deserialize)]
struct CinemetaResponse {
    meta: Option<CinemetaMeta>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CinemetaMeta {
    name: Option<String>,
    year: Option<serde_json::Value>,
    release_info: Option<String>,
}

impl CinemetaMeta {
    /// An unnamed meta counts as unknown.
    fn into_canonical(self) -> Option<CanonicalTitle> {
        let name = self.name.filter(|n| !n.trim().is_empty())?;
        let year = match self.year {
            Some(serde_json::Value::Number(n)) => n.as_u64().map(|y| y as u32),
            Some(serde_json::Value::String(s)) => parse_year(&s),
            _ => None,
        }
        .or_else(|| self.release_info.as_deref().and_then(parse_year));

        Some(CanonicalTitle { name, year })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Option<CanonicalTitle> {
        let response: CinemetaResponse = serde_json::from_str(json).unwrap();
        response.meta.and_then(CinemetaMeta::into_canonical)
    }

    #[test]
    fn test_series_year_range() {
        let title = parse(r#"{ "meta": { "name": "Demon Slayer: Kimetsu no Yaiba", "year": "2019–" } }"#)
            .unwrap();
        assert_eq!(title.name, "Demon Slayer: Kimetsu no Yaiba");
        assert_eq!(title.year, Some(2019));
    }

    #[test]
    fn test_numeric_year_and_release_info_fallback() {
        let title = parse(r#"{ "meta": { "name": "Your Name.", "year": 2016 } }"#).unwrap();
        assert_eq!(title.year, Some(2016));

        let title = parse(r#"{ "meta": { "name": "Your Name.", "releaseInfo": "2016" } }"#).unwrap();
        assert_eq!(title.year, Some(2016));
    }

    #[test]
    fn test_missing_meta_or_name() {
        assert!(parse(r#"{}"#).is_none());
        assert!(parse(r#"{ "meta": { "name": "  " } }"#).is_none());
    }
}
