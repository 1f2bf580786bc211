//! Title resolver over the Kitsu and IMDb namespaces.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::heuristics::{is_junk_title, is_latin_script, word_overlap};
use crate::media::{MediaId, MediaKind, MediaNamespace};
use crate::metadata::{AnimeCatalog, AnimeEntry, CanonicalTitle, CanonicalTitleSource};
use crate::metrics::TITLE_RESOLUTIONS;

use super::types::{ResolverConfig, TitleKey, TitleResolution};

/// Stores used by the resolver.
#[derive(Clone)]
pub struct ResolverCaches {
    /// Final resolutions keyed by kind and base id.
    pub titles: Arc<dyn CacheStore<TitleKey, TitleResolution>>,
    /// Canonical names keyed by `"<kind>:<imdb id>"`.
    pub canonical_names: Arc<dyn CacheStore<String, CanonicalTitle>>,
    /// Fuzzy catalog searches keyed by lower-cased query.
    pub anime_searches: Arc<dyn CacheStore<String, Vec<AnimeEntry>>>,
}

/// Turns media identifiers into candidate title strings.
pub struct TitleResolver {
    catalog: Arc<dyn AnimeCatalog>,
    canonical: Arc<dyn CanonicalTitleSource>,
    caches: ResolverCaches,
    config: ResolverConfig,
}

impl TitleResolver {
    pub fn new(
        catalog: Arc<dyn AnimeCatalog>,
        canonical: Arc<dyn CanonicalTitleSource>,
        caches: ResolverCaches,
        config: ResolverConfig,
    ) -> Self {
        Self {
            catalog,
            canonical,
            caches,
            config,
        }
    }

    /// Resolve an external identifier to candidate names.
    ///
    /// Never fails: unparseable identifiers and collaborator errors yield an
    /// empty resolution.
    pub async fn resolve(&self, kind: MediaKind, external_id: &str) -> TitleResolution {
        let id = match MediaId::parse(external_id) {
            Ok(id) => id,
            Err(e) => {
                debug!(external_id, error = %e, "Unparseable media identifier");
                TITLE_RESOLUTIONS.with_label_values(&["unknown", "invalid"]).inc();
                return TitleResolution::default();
            }
        };

        let namespace = id.namespace.label();
        let key = (kind, id.base_id());
        if let Some(cached) = self.caches.titles.get(&key) {
            TITLE_RESOLUTIONS.with_label_values(&[namespace, "cached"]).inc();
            return cached;
        }

        let resolution = match &id.namespace {
            MediaNamespace::Kitsu(kitsu_id) => self.resolve_kitsu(*kitsu_id).await,
            MediaNamespace::Imdb(imdb_id) => self.resolve_imdb(kind, imdb_id).await,
        };

        if resolution.is_empty() {
            info!(%kind, id = %key.1, "No titles resolved");
            TITLE_RESOLUTIONS.with_label_values(&[namespace, "empty"]).inc();
            self.caches.titles.set_expired(key, resolution.clone());
        } else {
            info!(
                %kind,
                id = %key.1,
                names = ?resolution.names,
                year = ?resolution.year,
                "Resolved titles"
            );
            TITLE_RESOLUTIONS.with_label_values(&[namespace, "resolved"]).inc();
            self.caches.titles.set(key, resolution.clone());
        }

        resolution
    }

    async fn resolve_kitsu(&self, kitsu_id: u64) -> TitleResolution {
        let entry = match self.catalog.get_anime(kitsu_id).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(
                    catalog = self.catalog.name(),
                    kitsu_id,
                    error = %e,
                    "Anime lookup failed"
                );
                return TitleResolution::default();
            }
        };

        let mut names = NameList::default();
        for title in entry.titles.variants() {
            names.push_filtered(title);
        }

        TitleResolution {
            names: names.into_inner(),
            year: entry.year,
        }
    }

    async fn resolve_imdb(&self, kind: MediaKind, imdb_id: &str) -> TitleResolution {
        let Some(canonical) = self.canonical_name(kind, imdb_id).await else {
            return TitleResolution::default();
        };

        let candidates = self.search_catalog(&canonical.name).await;
        let selected = select_candidate(
            &canonical.name,
            kind,
            &candidates,
            self.config.min_match_score,
        );

        let mut names = NameList::default();
        names.push(&canonical.name);

        let year = match selected {
            Some(entry) => {
                debug!(
                    imdb_id,
                    kitsu_id = entry.id,
                    canonical = %canonical.name,
                    "Matched catalog entry"
                );
                if let Some(romanized) = &entry.titles.romanized {
                    names.push_filtered(romanized);
                }
                if let Some(english) = &entry.titles.english {
                    names.push_filtered(english);
                }
                entry.year.or(canonical.year)
            }
            None => canonical.year,
        };

        TitleResolution {
            names: names.into_inner(),
            year,
        }
    }

    async fn canonical_name(&self, kind: MediaKind, imdb_id: &str) -> Option<CanonicalTitle> {
        let key = format!("{}:{}", kind, imdb_id);
        if let Some(cached) = self.caches.canonical_names.get(&key) {
            return Some(cached);
        }

        match self.canonical.canonical_title(kind, imdb_id).await {
            Ok(Some(title)) => {
                self.caches.canonical_names.set(key, title.clone());
                Some(title)
            }
            Ok(None) => {
                debug!(imdb_id, source = self.canonical.name(), "No canonical title");
                None
            }
            Err(e) => {
                warn!(
                    imdb_id,
                    source = self.canonical.name(),
                    error = %e,
                    "Canonical title lookup failed"
                );
                None
            }
        }
    }

    async fn search_catalog(&self, name: &str) -> Vec<AnimeEntry> {
        let key = name.to_lowercase();
        if let Some(cached) = self.caches.anime_searches.get(&key) {
            return cached;
        }

        match self
            .catalog
            .search_anime(name, self.config.search_limit)
            .await
        {
            Ok(entries) => {
                if entries.is_empty() {
                    self.caches.anime_searches.set_expired(key, entries.clone());
                } else {
                    self.caches.anime_searches.set(key, entries.clone());
                }
                entries
            }
            Err(e) => {
                warn!(
                    catalog = self.catalog.name(),
                    query = name,
                    error = %e,
                    "Anime search failed"
                );
                Vec::new()
            }
        }
    }
}

/// Pick the catalog entry that best matches a canonical name.
///
/// Preference: best score above threshold with a matching format, then best
/// score above threshold, then the first candidate. Ties keep list order.
fn select_candidate<'a>(
    reference: &str,
    kind: MediaKind,
    candidates: &'a [AnimeEntry],
    threshold: f32,
) -> Option<&'a AnimeEntry> {
    let scored: Vec<(f32, &AnimeEntry)> = candidates
        .iter()
        .map(|c| (word_overlap(reference, &c.titles.variants()), c))
        .filter(|(score, _)| *score >= threshold)
        .collect();

    let format_matches = |entry: &AnimeEntry| match kind {
        MediaKind::Series => entry.format.is_series_like(),
        MediaKind::Movie => entry.format.is_movie_like(),
    };

    best(scored.iter().filter(|(_, c)| format_matches(*c)))
        .or_else(|| best(scored.iter()))
        .or_else(|| candidates.first())
}

fn best<'a, 'b>(
    scored: impl Iterator<Item = &'b (f32, &'a AnimeEntry)>,
) -> Option<&'a AnimeEntry>
where
    'a: 'b,
{
    let mut best: Option<(f32, &'a AnimeEntry)> = None;
    for (score, entry) in scored {
        if best.map_or(true, |(top, _)| *score > top) {
            best = Some((*score, *entry));
        }
    }
    best.map(|(_, entry)| entry)
}

/// Ordered, case-insensitively deduplicated names.
#[derive(Default)]
struct NameList {
    names: Vec<String>,
    seen: HashSet<String>,
}

impl NameList {
    fn push(&mut self, name: &str) {
        let name = name.trim();
        if !name.is_empty() && self.seen.insert(name.to_lowercase()) {
            self.names.push(name.to_string());
        }
    }

    /// Push unless the name is in non-Latin script or describes side material.
    fn push_filtered(&mut self, name: &str) {
        if is_latin_script(name) && !is_junk_title(name) {
            self.push(name);
        }
    }

    fn into_inner(self) -> Vec<String> {
        self.names
    }
}
