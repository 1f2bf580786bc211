//! Discovery engine: searches every query variant of a title concurrently.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::heuristics::query_variants;
use crate::metrics::{DISCOVERY_CANDIDATES, SEARCH_QUERIES};
use crate::searcher::{
    deduplicate_records, RawTorrentResult, SearchQuery, Searcher, TorrentRecord,
};

use super::rank::filter_and_rank;
use super::{DiscoveryConfig, SearchKey};

/// Finds and ranks torrents for a set of titles.
pub struct DiscoveryEngine {
    searcher: Arc<dyn Searcher>,
    cache: Arc<dyn CacheStore<SearchKey, Vec<TorrentRecord>>>,
    config: DiscoveryConfig,
}

impl DiscoveryEngine {
    pub fn new(
        searcher: Arc<dyn Searcher>,
        cache: Arc<dyn CacheStore<SearchKey, Vec<TorrentRecord>>>,
        config: DiscoveryConfig,
    ) -> Self {
        Self {
            searcher,
            cache,
            config,
        }
    }

    /// Ranked torrents for the given titles, most authoritative title first.
    ///
    /// The primary title is searched first. Only when nothing survives
    /// filtering are the remaining titles searched, concurrently, with all
    /// raw results ranked together as one list.
    pub async fn discover(
        &self,
        titles: &[String],
        episode: Option<u32>,
        season: Option<u32>,
    ) -> Vec<TorrentRecord> {
        let Some((primary, fallbacks)) = titles.split_first() else {
            return Vec::new();
        };

        let key = SearchKey::new(titles, episode, season);
        if let Some(cached) = self.cache.get(&key) {
            debug!(titles = %key.titles, "Discovery served from cache");
            return cached;
        }

        let mut raw = self.search_title(primary, episode).await;
        let mut ranked = self.rank(raw.clone(), episode, season);

        if ranked.is_empty() && !fallbacks.is_empty() {
            debug!(primary = %primary, "Primary title found nothing, trying other titles");
            let searches = fallbacks.iter().map(|title| self.search_title(title, episode));
            raw.extend(join_all(searches).await.into_iter().flatten());
            ranked = self.rank(raw, episode, season);
        }

        info!(
            titles = %key.titles,
            episode = ?episode,
            season = ?season,
            candidates = ranked.len(),
            "Discovery complete"
        );
        DISCOVERY_CANDIDATES.observe(ranked.len() as f64);

        if ranked.is_empty() {
            self.cache.set_expired(key, ranked.clone());
        } else {
            self.cache.set(key, ranked.clone());
        }
        ranked
    }

    fn rank(
        &self,
        raw: Vec<RawTorrentResult>,
        episode: Option<u32>,
        season: Option<u32>,
    ) -> Vec<TorrentRecord> {
        filter_and_rank(deduplicate_records(raw), episode, season, &self.config)
    }

    /// Issue every query for one title concurrently and merge the results.
    async fn search_title(&self, title: &str, episode: Option<u32>) -> Vec<RawTorrentResult> {
        let queries = title_queries(title, episode);
        debug!(title, queries = queries.len(), "Searching title");

        let searches = queries.iter().map(|q| self.search_query(q));
        join_all(searches).await.into_iter().flatten().collect()
    }

    async fn search_query(&self, query: &str) -> Vec<RawTorrentResult> {
        let searcher = self.searcher.name();
        match self.searcher.search(&SearchQuery::anime(query)).await {
            Ok(results) => {
                SEARCH_QUERIES.with_label_values(&[searcher, "success"]).inc();
                debug!(searcher, query, results = results.len(), "Query complete");
                results
            }
            Err(e) => {
                SEARCH_QUERIES.with_label_values(&[searcher, "failed"]).inc();
                warn!(searcher, query, error = %e, "Query failed");
                Vec::new()
            }
        }
    }
}

/// Episode-specific variants, then the plain variants to catch batch packs.
fn title_queries(title: &str, episode: Option<u32>) -> Vec<String> {
    let mut queries = query_variants(title, episode);
    if episode.is_some() {
        queries.extend(query_variants(title, None));
    }

    let mut seen = HashSet::new();
    queries.retain(|q| seen.insert(q.to_lowercase()));
    queries
}
