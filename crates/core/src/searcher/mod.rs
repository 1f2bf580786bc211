//! Torrent index search abstraction.
//!
//! This module provides a `Searcher` trait for querying torrent indexes
//! (Nyaa RSS, Jackett) plus magnet helpers and info-hash deduplication.

mod dedup;
mod jackett;
mod magnet;
mod nyaa;
mod types;

pub use dedup::deduplicate_records;
pub use jackett::JackettSearcher;
pub use magnet::{build_magnet, extract_info_hash};
pub use nyaa::{parse_nyaa_feed, NyaaSearcher};
pub use types::*;
