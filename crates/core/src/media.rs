//! Media identifiers as they arrive from addon clients.
//!
//! Two namespaces are understood:
//! - `kitsu:<id>[:<episode>]` for Kitsu catalog entries
//! - `tt<digits>[:<season>:<episode>]` for IMDb titles

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while parsing media identifiers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MediaIdError {
    #[error("Empty media identifier")]
    Empty,

    #[error("Unknown identifier namespace: {0}")]
    UnknownNamespace(String),

    #[error("Malformed media identifier: {0}")]
    Malformed(String),

    #[error("Unknown media kind: {0}")]
    UnknownKind(String),
}

/// Kind of media a stream request is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Series,
    Movie,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Series => "series",
            MediaKind::Movie => "movie",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = MediaIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            // Some addon clients label Kitsu series as "anime".
            "series" | "anime" => Ok(MediaKind::Series),
            "movie" => Ok(MediaKind::Movie),
            other => Err(MediaIdError::UnknownKind(other.to_string())),
        }
    }
}

/// Identifier namespace plus the base identifier within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "namespace", content = "id", rename_all = "lowercase")]
pub enum MediaNamespace {
    /// Numeric Kitsu anime id.
    Kitsu(u64),
    /// IMDb title id including the `tt` prefix.
    Imdb(String),
}

impl MediaNamespace {
    /// Short label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            MediaNamespace::Kitsu(_) => "kitsu",
            MediaNamespace::Imdb(_) => "imdb",
        }
    }
}

/// A parsed media identifier with optional season/episode suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaId {
    pub namespace: MediaNamespace,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
}

impl MediaId {
    /// Parse an external identifier such as `kitsu:11469:3` or `tt9335498:1:2`.
    pub fn parse(raw: &str) -> Result<Self, MediaIdError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(MediaIdError::Empty);
        }

        if let Some(rest) = raw.strip_prefix("kitsu:") {
            let parts: Vec<&str> = rest.split(':').collect();
            if parts.len() > 2 {
                return Err(MediaIdError::Malformed(raw.to_string()));
            }
            let id = parts[0]
                .parse::<u64>()
                .map_err(|_| MediaIdError::Malformed(raw.to_string()))?;
            let episode = parts
                .get(1)
                .map(|p| parse_number(p, raw))
                .transpose()?;
            return Ok(Self {
                namespace: MediaNamespace::Kitsu(id),
                season: None,
                episode,
            });
        }

        if raw.starts_with("tt") {
            let parts: Vec<&str> = raw.split(':').collect();
            let base = parts[0];
            if base.len() <= 2 || !base[2..].chars().all(|c| c.is_ascii_digit()) {
                return Err(MediaIdError::Malformed(raw.to_string()));
            }
            let (season, episode) = match parts.len() {
                1 => (None, None),
                3 => (
                    Some(parse_number(parts[1], raw)?),
                    Some(parse_number(parts[2], raw)?),
                ),
                _ => return Err(MediaIdError::Malformed(raw.to_string())),
            };
            return Ok(Self {
                namespace: MediaNamespace::Imdb(base.to_string()),
                season,
                episode,
            });
        }

        let namespace = raw.split(':').next().unwrap_or(raw);
        Err(MediaIdError::UnknownNamespace(namespace.to_string()))
    }

    /// The identifier without its season/episode suffix.
    pub fn base_id(&self) -> String {
        match &self.namespace {
            MediaNamespace::Kitsu(id) => format!("kitsu:{}", id),
            MediaNamespace::Imdb(id) => id.clone(),
        }
    }
}

impl FromStr for MediaId {
    type Err = MediaIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_id())?;
        match (&self.namespace, self.season, self.episode) {
            (MediaNamespace::Kitsu(_), _, Some(ep)) => write!(f, ":{}", ep),
            (MediaNamespace::Imdb(_), Some(season), Some(ep)) => write!(f, ":{}:{}", season, ep),
            _ => Ok(()),
        }
    }
}

fn parse_number(part: &str, raw: &str) -> Result<u32, MediaIdError> {
    part.parse::<u32>()
        .map_err(|_| MediaIdError::Malformed(raw.to_string()))
}
