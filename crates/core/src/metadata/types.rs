//! Types for metadata service responses.

use serde::{Deserialize, Serialize};

/// Title variants of an anime entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimeTitles {
    /// Romanized Japanese title ("Kimetsu no Yaiba").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub romanized: Option<String>,
    /// English title ("Demon Slayer: Kimetsu no Yaiba").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english: Option<String>,
    /// Title in native script ("鬼滅の刃").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native: Option<String>,
    /// Catalog's canonical display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
}

impl AnimeTitles {
    /// All present titles: romanized, English, canonical, native.
    pub fn variants(&self) -> Vec<&str> {
        [&self.romanized, &self.english, &self.canonical, &self.native]
            .into_iter()
            .filter_map(|t| t.as_deref())
            .filter(|t| !t.trim().is_empty())
            .collect()
    }
}

/// Structural format of an anime entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimeFormat {
    Tv,
    Movie,
    Ova,
    Ona,
    Special,
    Music,
    Unknown,
}

impl AnimeFormat {
    /// Parse a Kitsu `subtype` value.
    pub fn from_subtype(subtype: &str) -> Self {
        match subtype.to_ascii_lowercase().as_str() {
            "tv" => AnimeFormat::Tv,
            "movie" => AnimeFormat::Movie,
            "ova" => AnimeFormat::Ova,
            "ona" => AnimeFormat::Ona,
            "special" => AnimeFormat::Special,
            "music" => AnimeFormat::Music,
            _ => AnimeFormat::Unknown,
        }
    }

    /// Episodic formats.
    pub fn is_series_like(&self) -> bool {
        matches!(
            self,
            AnimeFormat::Tv | AnimeFormat::Ona | AnimeFormat::Ova | AnimeFormat::Special
        )
    }

    pub fn is_movie_like(&self) -> bool {
        matches!(self, AnimeFormat::Movie)
    }
}

/// An anime catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimeEntry {
    pub id: u64,
    pub titles: AnimeTitles,
    pub format: AnimeFormat,
    /// Year the show started airing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
}

/// Canonical name for an IMDb title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalTitle {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
}

/// Leading four-digit year of a date-like string ("2019-04-06", "2019–2024").
pub fn parse_year(value: &str) -> Option<u32> {
    let digits: String = value.trim().chars().take(4).collect();
    if digits.len() == 4 && digits.chars().all(|c| c.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_variants_order_and_skip_missing() {
        let titles = AnimeTitles {
            romanized: Some("Kimetsu no Yaiba".to_string()),
            english: Some("Demon Slayer".to_string()),
            native: Some("鬼滅の刃".to_string()),
            canonical: None,
        };
        assert_eq!(
            titles.variants(),
            vec!["Kimetsu no Yaiba", "Demon Slayer", "鬼滅の刃"]
        );
    }

    #[test]
    fn test_format_classification() {
        assert!(AnimeFormat::from_subtype("TV").is_series_like());
        assert!(AnimeFormat::from_subtype("ONA").is_series_like());
        assert!(AnimeFormat::from_subtype("movie").is_movie_like());
        assert!(!AnimeFormat::from_subtype("movie").is_series_like());
        assert_eq!(AnimeFormat::from_subtype("weird"), AnimeFormat::Unknown);
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2019-04-06"), Some(2019));
        assert_eq!(parse_year("2019–2024"), Some(2019));
        assert_eq!(parse_year("19"), None);
        assert_eq!(parse_year(""), None);
    }
}
