//! Deduplication of torrent search results by info hash.

use std::collections::HashMap;

use tracing::debug;

use super::magnet::extract_info_hash;
use super::{RawTorrentResult, TorrentRecord};

/// Deduplicate raw results by the info hash in their magnet URI.
///
/// Results without an extractable hash are dropped. When several results
/// share a hash, the one with the most seeders is kept, with ties going to
/// the lexicographically smaller name, so the outcome does not depend on
/// input order.
///
/// The returned list is sorted by seeders (descending), then info hash.
pub fn deduplicate_records(raw: Vec<RawTorrentResult>) -> Vec<TorrentRecord> {
    let mut by_hash: HashMap<String, TorrentRecord> = HashMap::new();
    let mut dropped = 0usize;

    for r in raw {
        let Some(info_hash) = extract_info_hash(&r.magnet_uri) else {
            dropped += 1;
            continue;
        };

        match by_hash.get_mut(&info_hash) {
            Some(existing) => {
                let better = r.seeders > existing.seeders
                    || (r.seeders == existing.seeders && r.name < existing.name);
                if better {
                    existing.name = r.name;
                    existing.magnet_uri = r.magnet_uri;
                    existing.seeders = r.seeders;
                    existing.size_label = r.size_label;
                }
            }
            None => {
                by_hash.insert(
                    info_hash.clone(),
                    TorrentRecord {
                        name: r.name,
                        magnet_uri: r.magnet_uri,
                        info_hash,
                        seeders: r.seeders,
                        size_label: r.size_label,
                    },
                );
            }
        }
    }

    if dropped > 0 {
        debug!(dropped, "Dropped results without an info hash");
    }

    let mut results: Vec<_> = by_hash.into_values().collect();
    results.sort_by(|a, b| {
        b.seeders
            .cmp(&a.seeders)
            .then_with(|| a.info_hash.cmp(&b.info_hash))
    });
    results
}
