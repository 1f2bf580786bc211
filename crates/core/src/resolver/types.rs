//! Types for title resolution.

use serde::{Deserialize, Serialize};

use crate::media::MediaKind;

/// Resolver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Candidates requested from the fuzzy catalog search.
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
    /// Minimum word overlap for a search candidate to count as a match.
    #[serde(default = "default_min_match_score")]
    pub min_match_score: f32,
}

fn default_search_limit() -> u32 {
    10
}

fn default_min_match_score() -> f32 {
    0.3
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            search_limit: default_search_limit(),
            min_match_score: default_min_match_score(),
        }
    }
}

/// Searchable names for a media item, most authoritative first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleResolution {
    pub names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
}

impl TitleResolution {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Cache key for resolved titles: kind plus base identifier.
pub type TitleKey = (MediaKind, String);
