use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use crate::debrid::DebridConfig;
use crate::discovery::DiscoveryConfig;
use crate::metadata::{CinemetaConfig, KitsuConfig};
use crate::resolver::ResolverConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub addon: AddonConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub searcher: SearcherConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub debrid: DebridConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Addon presentation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddonConfig {
    /// Externally reachable base URL, used to build play links.
    #[serde(default = "default_public_url")]
    pub public_url: String,
    /// URL handed out while no stream is available or a conversion is still running.
    /// Defaults to `<public_url>/placeholder`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder_url: Option<String>,
    /// Display name in the manifest and stream list.
    #[serde(default = "default_addon_name")]
    pub name: String,
    /// Maximum number of streams returned per request.
    #[serde(default = "default_max_streams")]
    pub max_streams: usize,
}

impl AddonConfig {
    pub fn placeholder_url(&self) -> String {
        match &self.placeholder_url {
            Some(url) => url.clone(),
            None => format!("{}/placeholder", self.public_url.trim_end_matches('/')),
        }
    }
}

impl Default for AddonConfig {
    fn default() -> Self {
        Self {
            public_url: default_public_url(),
            placeholder_url: None,
            name: default_addon_name(),
            max_streams: default_max_streams(),
        }
    }
}

fn default_public_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_addon_name() -> String {
    "anistream".to_string()
}

fn default_max_streams() -> usize {
    15
}

/// Cache lifetimes
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Resolved titles (default: 24 hours).
    #[serde(default = "default_titles_ttl")]
    pub titles_ttl_secs: u64,
    /// Ranked torrent search results (default: 30 minutes).
    #[serde(default = "default_search_ttl")]
    pub search_ttl_secs: u64,
    /// Converted stream URLs (default: 1 hour).
    #[serde(default = "default_conversion_ttl")]
    pub conversion_ttl_secs: u64,
    /// Canonical names and fuzzy search results (default: 20 minutes).
    #[serde(default = "default_metadata_ttl")]
    pub metadata_ttl_secs: u64,
    /// How often expired entries are swept (default: 10 minutes).
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl CacheConfig {
    pub fn titles_ttl(&self) -> Duration {
        Duration::from_secs(self.titles_ttl_secs)
    }

    pub fn search_ttl(&self) -> Duration {
        Duration::from_secs(self.search_ttl_secs)
    }

    pub fn conversion_ttl(&self) -> Duration {
        Duration::from_secs(self.conversion_ttl_secs)
    }

    pub fn metadata_ttl(&self) -> Duration {
        Duration::from_secs(self.metadata_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            titles_ttl_secs: default_titles_ttl(),
            search_ttl_secs: default_search_ttl(),
            conversion_ttl_secs: default_conversion_ttl(),
            metadata_ttl_secs: default_metadata_ttl(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_titles_ttl() -> u64 {
    24 * 60 * 60
}

fn default_search_ttl() -> u64 {
    30 * 60
}

fn default_conversion_ttl() -> u64 {
    60 * 60
}

fn default_metadata_ttl() -> u64 {
    20 * 60
}

fn default_sweep_interval() -> u64 {
    10 * 60
}

/// Metadata service configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetadataConfig {
    #[serde(default)]
    pub kitsu: KitsuConfig,
    #[serde(default)]
    pub cinemeta: CinemetaConfig,
}

/// Searcher configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearcherConfig {
    /// Search backend type
    #[serde(default)]
    pub backend: SearcherBackend,
    #[serde(default)]
    pub nyaa: NyaaConfig,
    /// Jackett-specific configuration (required when backend = "jackett")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jackett: Option<JackettConfig>,
}

/// Available search backends
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearcherBackend {
    #[default]
    Nyaa,
    Jackett,
}

impl SearcherBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearcherBackend::Nyaa => "nyaa",
            SearcherBackend::Jackett => "jackett",
        }
    }
}

/// Nyaa RSS backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NyaaConfig {
    #[serde(default = "default_nyaa_url")]
    pub base_url: String,
    /// Nyaa category filter (default: "1_2", English-translated anime)
    #[serde(default = "default_nyaa_category")]
    pub category: String,
    /// Trackers added to the magnets built from feed items
    #[serde(default = "default_trackers")]
    pub trackers: Vec<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for NyaaConfig {
    fn default() -> Self {
        Self {
            base_url: default_nyaa_url(),
            category: default_nyaa_category(),
            trackers: default_trackers(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_nyaa_url() -> String {
    "https://nyaa.si".to_string()
}

fn default_nyaa_category() -> String {
    "1_2".to_string()
}

fn default_trackers() -> Vec<String> {
    [
        "http://nyaa.tracker.wf:7777/announce",
        "udp://open.stealth.si:80/announce",
        "udp://tracker.opentrackr.org:1337/announce",
        "udp://exodus.desync.com:6969/announce",
        "udp://tracker.torrent.eu.org:451/announce",
    ]
    .iter()
    .map(|t| t.to_string())
    .collect()
}

/// Jackett search backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JackettConfig {
    /// Jackett server URL (e.g., "http://localhost:9117")
    pub url: String,
    /// Jackett API key
    pub api_key: String,
    /// Indexer to query (default: "all")
    #[serde(default = "default_indexer")]
    pub indexer: String,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_indexer() -> String {
    "all".to_string()
}

fn default_timeout() -> u32 {
    10
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub addon: AddonConfig,
    pub cache: CacheConfig,
    pub metadata: MetadataConfig,
    pub resolver: ResolverConfig,
    pub searcher: SanitizedSearcherConfig,
    pub discovery: DiscoveryConfig,
    pub debrid: DebridConfig,
}

/// Sanitized searcher config (API key redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedSearcherConfig {
    pub backend: String,
    pub nyaa: NyaaConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jackett: Option<SanitizedJackettConfig>,
}

/// Sanitized Jackett config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedJackettConfig {
    pub url: String,
    pub indexer: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            addon: config.addon.clone(),
            cache: config.cache.clone(),
            metadata: config.metadata.clone(),
            resolver: config.resolver.clone(),
            searcher: SanitizedSearcherConfig {
                backend: config.searcher.backend.as_str().to_string(),
                nyaa: config.searcher.nyaa.clone(),
                jackett: config
                    .searcher
                    .jackett
                    .as_ref()
                    .map(|j| SanitizedJackettConfig {
                        url: j.url.clone(),
                        indexer: j.indexer.clone(),
                        api_key_configured: !j.api_key.is_empty(),
                        timeout_secs: j.timeout_secs,
                    }),
            },
            discovery: config.discovery.clone(),
            debrid: config.debrid.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.addon.max_streams, 15);
        assert_eq!(config.cache.titles_ttl_secs, 86400);
        assert_eq!(config.cache.search_ttl_secs, 1800);
        assert_eq!(config.cache.conversion_ttl_secs, 3600);
        assert_eq!(config.cache.metadata_ttl_secs, 1200);
        assert_eq!(config.searcher.backend, SearcherBackend::Nyaa);
        assert_eq!(config.searcher.nyaa.category, "1_2");
        assert!(config.searcher.jackett.is_none());
        assert_eq!(config.debrid.poll_interval_ms, 2000);
        assert_eq!(config.debrid.max_poll_attempts, 10);
        assert_eq!(config.debrid.play_wait_secs, 8);
        assert!(!config.discovery.season_keywords.is_empty());
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[addon]
public_url = "https://streams.example.org"
max_streams = 5

[searcher]
backend = "jackett"

[searcher.jackett]
url = "http://localhost:9117"
api_key = "abc"

[discovery]
release_groups = ["SubsPlease", "Erai-raws"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.addon.max_streams, 5);
        assert_eq!(config.addon.name, "anistream");
        assert_eq!(config.searcher.backend, SearcherBackend::Jackett);

        let jackett = config.searcher.jackett.unwrap();
        assert_eq!(jackett.indexer, "all");
        assert_eq!(jackett.timeout_secs, 10);
        assert_eq!(config.discovery.release_groups, vec!["SubsPlease", "Erai-raws"]);
    }

    #[test]
    fn test_placeholder_url_defaults_to_public_url() {
        let mut addon = AddonConfig {
            public_url: "https://streams.example.org/".to_string(),
            ..AddonConfig::default()
        };
        assert_eq!(
            addon.placeholder_url(),
            "https://streams.example.org/placeholder"
        );

        addon.placeholder_url = Some("https://cdn.example.org/wait.mp4".to_string());
        assert_eq!(addon.placeholder_url(), "https://cdn.example.org/wait.mp4");
    }

    #[test]
    fn test_deserialize_invalid_backend_fails() {
        let toml = r#"
[searcher]
backend = "prowlarr"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_sanitized_config_hides_api_key() {
        let mut config = Config::default();
        config.searcher.backend = SearcherBackend::Jackett;
        config.searcher.jackett = Some(JackettConfig {
            url: "http://localhost:9117".to_string(),
            api_key: "super-secret".to_string(),
            indexer: "nyaasi".to_string(),
            timeout_secs: 10,
        });

        let sanitized = SanitizedConfig::from(&config);
        assert_eq!(sanitized.searcher.backend, "jackett");
        let jackett = sanitized.searcher.jackett.as_ref().unwrap();
        assert!(jackett.api_key_configured);
        assert_eq!(jackett.indexer, "nyaasi");

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("super-secret"));
    }
}
