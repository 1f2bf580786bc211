//! Mock debrid provider for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::debrid::{DebridError, DebridFile, DebridProvider, DebridTorrentInfo};

/// A recorded provider call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedDebridCall {
    AddMagnet { token: String, magnet: String },
    TorrentInfo { id: String },
    SelectFiles { id: String, file_ids: Vec<u64> },
    Unrestrict { link: String },
}

/// Mock implementation of the DebridProvider trait.
///
/// Simulates the provider lifecycle: a torrent reports its files right
/// after being added, and reports links once it has been polled
/// `polls_until_ready` times after file selection.
#[derive(Debug)]
pub struct MockDebridProvider {
    /// Files reported for every torrent.
    files: Arc<RwLock<Vec<DebridFile>>>,
    /// Status polls after selection before links appear.
    polls_until_ready: Arc<RwLock<u32>>,
    /// Fixed torrent id to return, instead of a generated one.
    torrent_id: Arc<RwLock<Option<String>>>,
    /// Polls seen per selected torrent id.
    polls: Arc<RwLock<HashMap<String, u32>>>,
    calls: Arc<RwLock<Vec<RecordedDebridCall>>>,
    next_error: Arc<RwLock<Option<DebridError>>>,
    /// Panic inside `unrestrict`, simulating a crashed conversion task.
    panic_on_unrestrict: Arc<RwLock<bool>>,
    next_id: AtomicU64,
}

impl Default for MockDebridProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDebridProvider {
    /// Create a provider that converts every magnet after one poll.
    pub fn new() -> Self {
        Self {
            files: Arc::new(RwLock::new(vec![DebridFile {
                id: 1,
                path: "/episode.mkv".to_string(),
                bytes: 1024 * 1024 * 700,
            }])),
            polls_until_ready: Arc::new(RwLock::new(1)),
            torrent_id: Arc::new(RwLock::new(None)),
            polls: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            panic_on_unrestrict: Arc::new(RwLock::new(false)),
            next_id: AtomicU64::new(1),
        }
    }

    /// Set the files reported for torrents. An empty list simulates a
    /// torrent the provider cannot inspect.
    pub async fn set_files(&self, files: Vec<DebridFile>) {
        *self.files.write().await = files;
    }

    /// Set how many polls after selection it takes for links to appear.
    pub async fn set_polls_until_ready(&self, polls: u32) {
        *self.polls_until_ready.write().await = polls;
    }

    /// Return this torrent id from `add_magnet`.
    pub async fn set_torrent_id(&self, id: &str) {
        *self.torrent_id.write().await = Some(id.to_string());
    }

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: DebridError) {
        *self.next_error.write().await = Some(error);
    }

    /// Make `unrestrict` panic instead of answering.
    pub async fn set_panic_on_unrestrict(&self, panic: bool) {
        *self.panic_on_unrestrict.write().await = panic;
    }

    /// Get recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedDebridCall> {
        self.calls.read().await.clone()
    }

    /// Number of `add_magnet` calls, i.e. conversions started.
    pub async fn add_magnet_count(&self) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| matches!(c, RecordedDebridCall::AddMagnet { .. }))
            .count()
    }

    async fn record(&self, call: RecordedDebridCall) -> Result<(), DebridError> {
        self.calls.write().await.push(call);
        match self.next_error.write().await.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DebridProvider for MockDebridProvider {
    fn name(&self) -> &str {
        "mock-debrid"
    }

    async fn add_magnet(&self, token: &str, magnet: &str) -> Result<String, DebridError> {
        self.record(RecordedDebridCall::AddMagnet {
            token: token.to_string(),
            magnet: magnet.to_string(),
        })
        .await?;

        if let Some(id) = self.torrent_id.read().await.clone() {
            return Ok(id);
        }
        Ok(format!("MOCK{}", self.next_id.fetch_add(1, Ordering::SeqCst)))
    }

    async fn torrent_info(&self, _token: &str, id: &str) -> Result<DebridTorrentInfo, DebridError> {
        self.record(RecordedDebridCall::TorrentInfo { id: id.to_string() })
            .await?;

        let polls_until_ready = *self.polls_until_ready.read().await;
        let mut polls = self.polls.write().await;
        let (status, links) = match polls.get_mut(id) {
            None => ("waiting_files_selection", Vec::new()),
            Some(count) => {
                *count = count.saturating_add(1);
                if *count >= polls_until_ready {
                    ("downloaded", vec![format!("https://hoster.example.com/d/{}", id)])
                } else {
                    ("downloading", Vec::new())
                }
            }
        };

        Ok(DebridTorrentInfo {
            id: id.to_string(),
            status: status.to_string(),
            files: self.files.read().await.clone(),
            links,
        })
    }

    async fn select_files(
        &self,
        _token: &str,
        id: &str,
        file_ids: &[u64],
    ) -> Result<(), DebridError> {
        self.record(RecordedDebridCall::SelectFiles {
            id: id.to_string(),
            file_ids: file_ids.to_vec(),
        })
        .await?;

        self.polls.write().await.insert(id.to_string(), 0);
        Ok(())
    }

    async fn unrestrict(&self, _token: &str, link: &str) -> Result<String, DebridError> {
        self.record(RecordedDebridCall::Unrestrict {
            link: link.to_string(),
        })
        .await?;

        if *self.panic_on_unrestrict.read().await {
            panic!("mock debrid provider panicked in unrestrict");
        }

        let suffix = link.rsplit('/').next().unwrap_or_default();
        Ok(format!("https://download.example.com/{}/episode.mkv", suffix))
    }
}
