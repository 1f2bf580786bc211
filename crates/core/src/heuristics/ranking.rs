//! Ranking signals extracted from release names.

use once_cell::sync::Lazy;
use regex_lite::Regex;

static FULL_HD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(1080p|1920x1080)").expect("1080p pattern"));

static OTHER_HD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(720p|1280x720|2160p|3840x2160|\b4k\b)").expect("hd pattern")
});

/// Resolution preference; lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResolutionTier {
    FullHd,
    OtherHd,
    Unknown,
}

impl ResolutionTier {
    /// Short label for stream listings.
    pub fn label(&self) -> &'static str {
        match self {
            ResolutionTier::FullHd => "1080p",
            ResolutionTier::OtherHd => "HD",
            ResolutionTier::Unknown => "SD",
        }
    }
}

/// Resolution tier of a release name.
pub fn resolution_tier(name: &str) -> ResolutionTier {
    if FULL_HD.is_match(name) {
        ResolutionTier::FullHd
    } else if OTHER_HD.is_match(name) {
        ResolutionTier::OtherHd
    } else {
        ResolutionTier::Unknown
    }
}

/// Leading `[Group]` tag of a release name.
pub fn release_group(name: &str) -> Option<&str> {
    let rest = name.trim_start().strip_prefix('[')?;
    let end = rest.find(']')?;
    let group = rest[..end].trim();
    (!group.is_empty()).then_some(group)
}

/// Position of the release group in the preferred list.
///
/// Unknown or unlisted groups get `preferred.len()`, after every listed group.
pub fn release_group_priority(name: &str, preferred: &[String]) -> usize {
    release_group(name)
        .and_then(|group| {
            preferred
                .iter()
                .position(|p| p.eq_ignore_ascii_case(group))
        })
        .unwrap_or(preferred.len())
}
