//! Season detection for release names.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

static SEASON_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bS(\d{1,2})(?:E\d{1,4})?\b").expect("season code pattern"));

static SEASON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bseason\s*(\d{1,2})\b").expect("season word pattern"));

static ORDINAL_SEASON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\s+season\b").expect("ordinal season pattern")
});

/// A subtitle or arc name that implies a season number.
///
/// Long-running shows often drop the season number from release names in
/// favour of the arc title ("Swordsmith Village Arc"). The list is a plain
/// heuristic and is meant to be extended through configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonKeyword {
    pub keyword: String,
    pub season: u32,
}

impl SeasonKeyword {
    pub fn new(keyword: impl Into<String>, season: u32) -> Self {
        Self {
            keyword: keyword.into(),
            season,
        }
    }
}

/// Built-in arc keywords, numbered the way IMDb/Cinemeta number seasons.
pub fn default_season_keywords() -> Vec<SeasonKeyword> {
    vec![
        SeasonKeyword::new("mugen train", 2),
        SeasonKeyword::new("entertainment district", 2),
        SeasonKeyword::new("swordsmith village", 3),
        SeasonKeyword::new("hashira training", 4),
        SeasonKeyword::new("shibuya incident", 2),
        SeasonKeyword::new("hidden inventory", 2),
        SeasonKeyword::new("final season", 4),
    ]
}

/// Explicit season carried by a release name, if any.
///
/// Checks `S02`/`S02E05`, `Season 2`, `2nd Season`, then the keyword list.
pub fn extract_season(name: &str, keywords: &[SeasonKeyword]) -> Option<u32> {
    for pattern in [&*SEASON_CODE, &*SEASON_WORD, &*ORDINAL_SEASON] {
        if let Some(season) = pattern
            .captures(name)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
        {
            return Some(season);
        }
    }

    let lower = name.to_lowercase();
    keywords
        .iter()
        .find(|k| !k.keyword.is_empty() && lower.contains(&k.keyword.to_lowercase()))
        .map(|k| k.season)
}

/// Whether a release name belongs to the requested season.
///
/// Names without any season marker count as season 1.
pub fn matches_season(name: &str, season: u32, keywords: &[SeasonKeyword]) -> bool {
    extract_season(name, keywords).unwrap_or(1) == season
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> Vec<SeasonKeyword> {
        default_season_keywords()
    }

    #[test]
    fn test_season_codes() {
        assert_eq!(extract_season("Show S02E05 1080p", &[]), Some(2));
        assert_eq!(extract_season("Show S3 [Batch]", &[]), Some(3));
        assert_eq!(extract_season("[SubsPlease] Show - 05", &[]), None);
    }

    #[test]
    fn test_season_words_and_ordinals() {
        assert_eq!(extract_season("Show Season 2 - 05", &[]), Some(2));
        assert_eq!(extract_season("Show 2nd Season - 05", &[]), Some(2));
        assert_eq!(extract_season("Show 3rd Season", &[]), Some(3));
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            extract_season("Kimetsu no Yaiba Swordsmith Village Arc - 01", &keywords()),
            Some(3)
        );
        assert_eq!(
            extract_season("Kimetsu no Yaiba Swordsmith Village Arc - 01", &[]),
            None
        );
    }

    #[test]
    fn test_explicit_marker_beats_keyword() {
        assert_eq!(
            extract_season("Show S05 Mugen Train", &keywords()),
            Some(5)
        );
    }

    #[test]
    fn test_season_one_excludes_second_season() {
        assert!(!matches_season("Show 2nd Season - 01 [1080p]", 1, &keywords()));
    }

    #[test]
    fn test_unmarked_release_is_season_one() {
        assert!(matches_season("[SubsPlease] Show - 01 (1080p)", 1, &keywords()));
        assert!(!matches_season("[SubsPlease] Show - 01 (1080p)", 2, &keywords()));
    }
}
