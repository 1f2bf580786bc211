//! Torrent discovery: fan-out search, deduplication, filtering and ranking.

mod engine;
mod rank;
mod types;

pub use engine::DiscoveryEngine;
pub use rank::filter_and_rank;
pub use types::*;
