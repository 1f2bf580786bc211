//! Types for torrent discovery.

use serde::{Deserialize, Serialize};

use crate::heuristics::{default_season_keywords, SeasonKeyword};

/// Discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Preferred release groups, best first. Matched case-insensitively
    /// against the leading `[Group]` tag.
    #[serde(default = "default_release_groups")]
    pub release_groups: Vec<String>,
    /// Arc names that imply a season number.
    #[serde(default = "default_season_keywords")]
    pub season_keywords: Vec<SeasonKeyword>,
}

fn default_release_groups() -> Vec<String> {
    ["SubsPlease", "Erai-raws", "EMBER", "ASW", "Judas"]
        .iter()
        .map(|g| g.to_string())
        .collect()
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            release_groups: default_release_groups(),
            season_keywords: default_season_keywords(),
        }
    }
}

/// Cache key for a discovery: all titles, episode and season.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchKey {
    /// Titles joined with `|`.
    pub titles: String,
    pub episode: Option<u32>,
    pub season: Option<u32>,
}

impl SearchKey {
    pub fn new(titles: &[String], episode: Option<u32>, season: Option<u32>) -> Self {
        Self {
            titles: titles.join("|"),
            episode,
            season,
        }
    }
}
