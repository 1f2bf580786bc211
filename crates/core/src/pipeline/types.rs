//! Types for stream requests and results.

use serde::{Deserialize, Serialize};

use crate::media::{MediaId, MediaKind, MediaNamespace};

/// A request for streams of one media item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRequest {
    pub kind: MediaKind,
    /// External identifier as received (`kitsu:41370:3`, `tt9335498:1:3`).
    pub external_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    /// Debrid account key; empty or `"none"` for plain magnets.
    #[serde(default)]
    pub account: String,
}

impl StreamRequest {
    /// Build a request, taking episode and season from the identifier suffix.
    pub fn from_id(kind: MediaKind, external_id: &str, account: &str) -> Self {
        let (episode, season) = match MediaId::parse(external_id) {
            Ok(id) => match id.namespace {
                // Kitsu ids name a single season already.
                MediaNamespace::Kitsu(_) => (id.episode, None),
                MediaNamespace::Imdb(_) => (id.episode, id.season),
            },
            Err(_) => (None, None),
        };

        Self {
            kind,
            external_id: external_id.to_string(),
            episode,
            season,
            account: account.to_string(),
        }
    }
}

/// A playable stream entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamCandidate {
    /// Short label ("anistream 1080p").
    pub name: String,
    /// Torrent name and stats, or the placeholder message.
    pub title: String,
    pub url: String,
    /// Absent for placeholder entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_hash: Option<String>,
}

impl StreamCandidate {
    pub fn is_placeholder(&self) -> bool {
        self.info_hash.is_none()
    }
}
