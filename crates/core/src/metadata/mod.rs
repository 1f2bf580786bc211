//! Metadata lookups used to turn media identifiers into titles.
//!
//! Kitsu provides anime entries by id and fuzzy search by name. Cinemeta
//! provides the canonical English name for IMDb identifiers.

mod cinemeta;
mod kitsu;
mod types;

pub use cinemeta::{CinemetaClient, CinemetaConfig};
pub use kitsu::{KitsuClient, KitsuConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::media::MediaKind;

/// Errors that can occur when talking to metadata services.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Anime catalog with lookup by numeric id and search by name.
#[async_trait]
pub trait AnimeCatalog: Send + Sync {
    /// Catalog name for logging.
    fn name(&self) -> &str;

    /// Get an anime entry by id.
    async fn get_anime(&self, id: u64) -> Result<AnimeEntry, MetadataError>;

    /// Fuzzy search by title, best matches first.
    async fn search_anime(&self, query: &str, limit: u32)
        -> Result<Vec<AnimeEntry>, MetadataError>;
}

/// Source of canonical names for industry-standard (IMDb) identifiers.
#[async_trait]
pub trait CanonicalTitleSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &str;

    /// Canonical title for an IMDb id, or `None` when the id is unknown.
    async fn canonical_title(
        &self,
        kind: MediaKind,
        imdb_id: &str,
    ) -> Result<Option<CanonicalTitle>, MetadataError>;
}
