//! Kitsu API client.
//!
//! Kitsu speaks JSON:API: every resource is wrapped in `data` with the
//! interesting fields under `attributes`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::types::{parse_year, AnimeEntry, AnimeFormat, AnimeTitles};
use super::{AnimeCatalog, MetadataError};

const JSON_API: &str = "application/vnd.api+json";

/// Kitsu client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitsuConfig {
    /// Base URL (default: https://kitsu.io/api/edge).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u32,
}

fn default_base_url() -> String {
    "https://kitsu.io/api/edge".to_string()
}

fn default_timeout_secs() -> u32 {
    10
}

impl Default for KitsuConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Kitsu API client.
pub struct KitsuClient {
    client: Client,
    base_url: String,
}

impl KitsuClient {
    /// Create a new Kitsu client.
    pub fn new(config: KitsuConfig) -> Result<Self, MetadataError> {
        let client = Client::builder()
            .user_agent(format!("anistream/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<T, MetadataError> {
        let response = request.header("Accept", JSON_API).send().await?;

        let status = response.status();
        if status == 429 {
            warn!("Kitsu rate limit exceeded");
            return Err(MetadataError::RateLimitExceeded);
        }
        if status == 404 {
            return Err(MetadataError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MetadataError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| MetadataError::ParseError(format!("Failed to parse Kitsu {}: {}", what, e)))
    }
}

#[async_trait]
impl AnimeCatalog for KitsuClient {
    fn name(&self) -> &str {
        "kitsu"
    }

    async fn get_anime(&self, id: u64) -> Result<AnimeEntry, MetadataError> {
        let url = format!("{}/anime/{}", self.base_url, id);
        debug!(id, "Kitsu get anime");

        let response: KitsuSingle = self
            .fetch(self.client.get(&url), &format!("anime {}", id))
            .await?;
        response.data.try_into()
    }

    async fn search_anime(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<AnimeEntry>, MetadataError> {
        let url = format!("{}/anime", self.base_url);
        let limit = limit.clamp(1, 20); // Kitsu max page size is 20

        debug!(query, limit, "Kitsu search");

        let page_limit = limit.to_string();
        let request = self.client.get(&url).query(&[
            ("filter[text]", query),
            ("page[limit]", page_limit.as_str()),
        ]);
        let response: KitsuList = self.fetch(request, "search").await?;

        Ok(response
            .data
            .into_iter()
            .filter_map(|r| AnimeEntry::try_from(r).ok())
            .collect())
    }
}

// ============================================================================
// Kitsu API response types (internal)
// ============================================================================

#[derive(Debug, Deserialize)]
struct KitsuSingle {
    data: KitsuResource,
}

#[derive(Debug, Deserialize)]
struct KitsuList {
    #[serde(default)]
    data: Vec<KitsuResource>,
}

#[derive(Debug, Deserialize)]
struct KitsuResource {
    id: String,
    attributes: KitsuAttributes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KitsuAttributes {
    #[serde(default)]
    titles: KitsuTitles,
    canonical_title: Option<String>,
    subtype: Option<String>,
    start_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct KitsuTitles {
    en: Option<String>,
    en_us: Option<String>,
    en_jp: Option<String>,
    ja_jp: Option<String>,
}

impl TryFrom<KitsuResource> for AnimeEntry {
    type Error = MetadataError;

    fn try_from(r: KitsuResource) -> Result<Self, Self::Error> {
        let id = r
            .id
            .parse()
            .map_err(|_| MetadataError::ParseError(format!("Invalid Kitsu id: {}", r.id)))?;
        let attrs = r.attributes;

        Ok(AnimeEntry {
            id,
            titles: AnimeTitles {
                romanized: attrs.titles.en_jp,
                english: attrs.titles.en.or(attrs.titles.en_us),
                native: attrs.titles.ja_jp,
                canonical: attrs.canonical_title,
            },
            format: attrs
                .subtype
                .as_deref()
                .map(AnimeFormat::from_subtype)
                .unwrap_or(AnimeFormat::Unknown),
            year: attrs.start_date.as_deref().and_then(parse_year),
        })
    }
}
