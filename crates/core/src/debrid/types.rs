//! Types for debrid providers and conversions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by a debrid provider API.
#[derive(Debug, Error)]
pub enum DebridError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Request timeout")]
    Timeout,
}

impl From<reqwest::Error> for DebridError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            DebridError::Timeout
        } else if e.is_connect() {
            DebridError::ConnectionFailed(e.to_string())
        } else {
            DebridError::ApiError {
                status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                message: e.to_string(),
            }
        }
    }
}

/// A file inside a torrent held by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebridFile {
    pub id: u64,
    pub path: String,
    pub bytes: u64,
}

/// Provider-side state of a torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebridTorrentInfo {
    pub id: String,
    /// Provider status string ("waiting_files_selection", "downloaded", ...).
    pub status: String,
    pub files: Vec<DebridFile>,
    /// Hoster links, available once the provider has the content.
    pub links: Vec<String>,
}

/// REST API of a debrid service. `token` is the caller's account key.
#[async_trait]
pub trait DebridProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Register a magnet, returning the provider's torrent id.
    async fn add_magnet(&self, token: &str, magnet: &str) -> Result<String, DebridError>;

    async fn torrent_info(&self, token: &str, id: &str) -> Result<DebridTorrentInfo, DebridError>;

    async fn select_files(&self, token: &str, id: &str, file_ids: &[u64])
        -> Result<(), DebridError>;

    /// Turn a hoster link into a direct download URL.
    async fn unrestrict(&self, token: &str, link: &str) -> Result<String, DebridError>;
}

/// Cache and coalescing key for a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversionKey {
    pub magnet: String,
    pub account: String,
}

impl ConversionKey {
    pub fn new(magnet: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            magnet: magnet.into(),
            account: account.into(),
        }
    }
}

/// Why a conversion did not produce a URL.
///
/// Cloneable so that every caller waiting on a conversion gets the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("Provider returned no torrent id")]
    EmptyTorrentId,

    #[error("Provider returned no files for the torrent")]
    NoFiles,

    #[error("No links after {attempts} status checks")]
    LinksNotReady { attempts: u32 },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Conversion task ended without a result")]
    Aborted,
}

impl From<DebridError> for ConversionError {
    fn from(e: DebridError) -> Self {
        ConversionError::Provider(e.to_string())
    }
}

/// Result of a bounded-wait play request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// Direct URL is available.
    Ready(String),
    /// Still converting; the conversion continues in the background.
    Pending,
    Failed(String),
}
