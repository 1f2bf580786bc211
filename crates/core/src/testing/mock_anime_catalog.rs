//! Mock anime catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::metadata::{AnimeCatalog, AnimeEntry, MetadataError};

/// A recorded catalog query for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCatalogQuery {
    GetAnime { id: u64 },
    SearchAnime { query: String, limit: u32 },
}

/// Mock implementation of the AnimeCatalog trait.
///
/// Entries are looked up by id; search results are registered per query
/// (case-insensitive exact match).
#[derive(Debug)]
pub struct MockAnimeCatalog {
    /// Entries by id.
    entries: Arc<RwLock<HashMap<u64, AnimeEntry>>>,
    /// Search results by lower-cased query.
    searches: Arc<RwLock<HashMap<String, Vec<AnimeEntry>>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedCatalogQuery>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<MetadataError>>>,
}

impl Default for MockAnimeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAnimeCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            searches: Arc::new(RwLock::new(HashMap::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Add an entry retrievable by id.
    pub async fn add_anime(&self, entry: AnimeEntry) {
        self.entries.write().await.insert(entry.id, entry);
    }

    /// Register the results of a search query.
    pub async fn add_search_results(&self, query: &str, results: Vec<AnimeEntry>) {
        self.searches
            .write()
            .await
            .insert(query.to_lowercase(), results);
    }

    /// Get recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedCatalogQuery> {
        self.queries.read().await.clone()
    }

    /// Get the number of queries performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: MetadataError) {
        *self.next_error.write().await = Some(error);
    }

    async fn take_error(&self) -> Option<MetadataError> {
        self.next_error.write().await.take()
    }

    async fn record(&self, query: RecordedCatalogQuery) {
        self.queries.write().await.push(query);
    }
}

#[async_trait]
impl AnimeCatalog for MockAnimeCatalog {
    fn name(&self) -> &str {
        "mock-catalog"
    }

    async fn get_anime(&self, id: u64) -> Result<AnimeEntry, MetadataError> {
        self.record(RecordedCatalogQuery::GetAnime { id }).await;
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.entries
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| MetadataError::NotFound(format!("anime {}", id)))
    }

    async fn search_anime(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<AnimeEntry>, MetadataError> {
        self.record(RecordedCatalogQuery::SearchAnime {
            query: query.to_string(),
            limit,
        })
        .await;
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        Ok(self
            .searches
            .read()
            .await
            .get(&query.to_lowercase())
            .map(|results| results.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }
}
