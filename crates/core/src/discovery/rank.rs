//! Filtering and ranking of deduplicated torrents.

use std::cmp::Reverse;

use crate::heuristics::{
    is_junk_release, matches_episode, matches_season, release_group_priority, resolution_tier,
};
use crate::searcher::TorrentRecord;

use super::DiscoveryConfig;

/// Drop junk and off-target records, then sort best first.
///
/// Order: resolution tier, release group priority, seeders (descending),
/// info hash. The info hash makes the order total, so the result does not
/// depend on the order records arrived in.
pub fn filter_and_rank(
    records: Vec<TorrentRecord>,
    episode: Option<u32>,
    season: Option<u32>,
    config: &DiscoveryConfig,
) -> Vec<TorrentRecord> {
    let mut kept: Vec<TorrentRecord> = records
        .into_iter()
        .filter(|r| !is_junk_release(&r.name))
        .filter(|r| episode.map_or(true, |ep| matches_episode(&r.name, ep)))
        .filter(|r| season.map_or(true, |s| matches_season(&r.name, s, &config.season_keywords)))
        .collect();

    kept.sort_by_cached_key(|r| {
        (
            resolution_tier(&r.name),
            release_group_priority(&r.name, &config.release_groups),
            Reverse(r.seeders),
            r.info_hash.clone(),
        )
    });
    kept
}
