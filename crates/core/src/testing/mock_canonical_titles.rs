//! Mock canonical title source for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::media::MediaKind;
use crate::metadata::{CanonicalTitle, CanonicalTitleSource, MetadataError};

/// Mock implementation of the CanonicalTitleSource trait.
///
/// Titles are registered per IMDb id and returned for any media kind.
#[derive(Debug)]
pub struct MockCanonicalTitles {
    titles: Arc<RwLock<HashMap<String, CanonicalTitle>>>,
    /// Recorded lookups as `(kind, imdb id)`.
    lookups: Arc<RwLock<Vec<(MediaKind, String)>>>,
    next_error: Arc<RwLock<Option<MetadataError>>>,
}

impl Default for MockCanonicalTitles {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCanonicalTitles {
    pub fn new() -> Self {
        Self {
            titles: Arc::new(RwLock::new(HashMap::new())),
            lookups: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Register a canonical title for an IMDb id.
    pub async fn add_title(&self, imdb_id: &str, name: &str, year: Option<u32>) {
        self.titles.write().await.insert(
            imdb_id.to_string(),
            CanonicalTitle {
                name: name.to_string(),
                year,
            },
        );
    }

    pub async fn recorded_lookups(&self) -> Vec<(MediaKind, String)> {
        self.lookups.read().await.clone()
    }

    pub async fn lookup_count(&self) -> usize {
        self.lookups.read().await.len()
    }

    /// Configure the next lookup to fail with the given error.
    pub async fn set_next_error(&self, error: MetadataError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl CanonicalTitleSource for MockCanonicalTitles {
    fn name(&self) -> &str {
        "mock-canonical"
    }

    async fn canonical_title(
        &self,
        kind: MediaKind,
        imdb_id: &str,
    ) -> Result<Option<CanonicalTitle>, MetadataError> {
        self.lookups
            .write()
            .await
            .push((kind, imdb_id.to_string()));
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        Ok(self.titles.read().await.get(imdb_id).cloned())
    }
}
