//! Heuristic string classification for anime titles and release names.
//!
//! Everything here is a pure function over strings: junk detection,
//! episode and season matching, title similarity, ranking signals and
//! search query variants. No I/O.

mod episode;
mod junk;
mod ranking;
mod season;
mod similarity;
mod variants;

pub use episode::matches_episode;
pub use junk::{is_junk_release, is_junk_title};
pub use ranking::{release_group, release_group_priority, resolution_tier, ResolutionTier};
pub use season::{default_season_keywords, extract_season, matches_season, SeasonKeyword};
pub use similarity::{is_latin_script, significant_words, word_overlap};
pub use variants::{base_variants, query_variants};
