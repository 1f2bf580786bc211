//! In-memory stores for every pipeline stage.

use std::sync::Arc;

use crate::cache::{CacheStore, MemoryCache, Sweep};
use crate::config::CacheConfig;
use crate::debrid::ConversionKey;
use crate::discovery::SearchKey;
use crate::metadata::{AnimeEntry, CanonicalTitle};
use crate::resolver::{ResolverCaches, TitleKey, TitleResolution};
use crate::searcher::TorrentRecord;

/// The pipeline's caches, kept concrete so the sweeper can reach them.
#[derive(Clone)]
pub struct PipelineCaches {
    pub titles: Arc<MemoryCache<TitleKey, TitleResolution>>,
    pub canonical_names: Arc<MemoryCache<String, CanonicalTitle>>,
    pub anime_searches: Arc<MemoryCache<String, Vec<AnimeEntry>>>,
    pub search: Arc<MemoryCache<SearchKey, Vec<TorrentRecord>>>,
    pub conversions: Arc<MemoryCache<ConversionKey, String>>,
}

impl PipelineCaches {
    /// Empty caches with lifetimes from configuration.
    pub fn in_memory(config: &CacheConfig) -> Self {
        Self {
            titles: Arc::new(MemoryCache::new("titles", config.titles_ttl())),
            canonical_names: Arc::new(MemoryCache::new("canonical_names", config.metadata_ttl())),
            anime_searches: Arc::new(MemoryCache::new("anime_searches", config.metadata_ttl())),
            search: Arc::new(MemoryCache::new("search", config.search_ttl())),
            conversions: Arc::new(MemoryCache::new("conversions", config.conversion_ttl())),
        }
    }

    pub fn resolver(&self) -> ResolverCaches {
        ResolverCaches {
            titles: self.titles.clone(),
            canonical_names: self.canonical_names.clone(),
            anime_searches: self.anime_searches.clone(),
        }
    }

    /// Every store, for the periodic sweeper.
    pub fn sweepers(&self) -> Vec<Arc<dyn Sweep>> {
        vec![
            self.titles.clone() as Arc<dyn Sweep>,
            self.canonical_names.clone() as Arc<dyn Sweep>,
            self.anime_searches.clone() as Arc<dyn Sweep>,
            self.search.clone() as Arc<dyn Sweep>,
            self.conversions.clone() as Arc<dyn Sweep>,
        ]
    }

    /// Stored entry count per cache, expired entries included until swept.
    pub fn entry_counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("titles", self.titles.len()),
            ("canonical_names", self.canonical_names.len()),
            ("anime_searches", self.anime_searches.len()),
            ("search", self.search.len()),
            ("conversions", self.conversions.len()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::sweep_all;

    #[test]
    fn test_sweepers_cover_every_store() {
        let caches = PipelineCaches::in_memory(&CacheConfig::default());
        let names: Vec<String> = caches
            .sweepers()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["titles", "canonical_names", "anime_searches", "search", "conversions"]
        );
    }

    #[test]
    fn test_sweep_removes_expired_entries() {
        let caches = PipelineCaches::in_memory(&CacheConfig::default());
        caches
            .conversions
            .set_expired(ConversionKey::new("magnet:?a", "token"), "url".to_string());
        caches
            .conversions
            .set(ConversionKey::new("magnet:?b", "token"), "url".to_string());

        assert_eq!(sweep_all(&caches.sweepers()), 1);
        assert_eq!(caches.conversions.len(), 1);
    }

    #[test]
    fn test_entry_counts() {
        let caches = PipelineCaches::in_memory(&CacheConfig::default());
        caches
            .search
            .set_expired(SearchKey::new(&["Show".to_string()], Some(1), None), Vec::new());

        let counts = caches.entry_counts();
        assert_eq!(counts.len(), 5);
        assert!(counts.contains(&("search", 1)));
        assert!(counts.contains(&("titles", 0)));
    }
}
