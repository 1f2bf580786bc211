//! Conversion coordinator: caching, coalescing and bounded waits.
//!
//! A conversion for a `(magnet, account)` pair runs at most once at a time.
//! It runs in its own task, so a caller that stops waiting never cancels it;
//! a finished conversion still lands in the cache for the next request.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use tokio::sync::watch;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::metrics::{CONVERSIONS_TOTAL, CONVERSION_DURATION};
use crate::searcher::extract_info_hash;

use super::config::DebridConfig;
use super::{ConversionError, ConversionKey, ConversionOutcome, DebridProvider};

/// Account key meaning "no debrid account".
pub const NO_ACCOUNT: &str = "none";

type ConversionResult = Result<String, ConversionError>;
type InFlight = Arc<Mutex<HashMap<ConversionKey, watch::Receiver<Option<ConversionResult>>>>>;

/// Whether an account key refers to a real debrid account.
pub fn has_account(account: &str) -> bool {
    let account = account.trim();
    !account.is_empty() && !account.eq_ignore_ascii_case(NO_ACCOUNT)
}

enum Conversion {
    Ready(String),
    Running(watch::Receiver<Option<ConversionResult>>),
}

/// Converts magnets to playable URLs through a debrid provider.
pub struct ConversionCoordinator {
    provider: Arc<dyn DebridProvider>,
    cache: Arc<dyn CacheStore<ConversionKey, String>>,
    in_flight: InFlight,
    config: DebridConfig,
}

impl ConversionCoordinator {
    pub fn new(
        provider: Arc<dyn DebridProvider>,
        cache: Arc<dyn CacheStore<ConversionKey, String>>,
        config: DebridConfig,
    ) -> Self {
        Self {
            provider,
            cache,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            config,
        }
    }

    /// Convert a magnet, waiting for the conversion to finish.
    ///
    /// Without an account the magnet is returned as-is.
    pub async fn convert(&self, magnet: &str, account: &str) -> Result<String, ConversionError> {
        if !has_account(account) {
            return Ok(magnet.to_string());
        }

        match self.begin(ConversionKey::new(magnet, account.trim())) {
            Conversion::Ready(url) => Ok(url),
            Conversion::Running(rx) => wait_for_outcome(rx).await,
        }
    }

    /// Convert a magnet, waiting at most `play_wait_secs`.
    ///
    /// When the deadline passes first the conversion keeps running in the
    /// background and `Pending` is returned.
    pub async fn play(&self, magnet: &str, account: &str) -> ConversionOutcome {
        if !has_account(account) {
            return ConversionOutcome::Ready(magnet.to_string());
        }

        let rx = match self.begin(ConversionKey::new(magnet, account.trim())) {
            Conversion::Ready(url) => return ConversionOutcome::Ready(url),
            Conversion::Running(rx) => rx,
        };

        match timeout(self.config.play_wait(), wait_for_outcome(rx)).await {
            Ok(Ok(url)) => ConversionOutcome::Ready(url),
            Ok(Err(e)) => ConversionOutcome::Failed(e.to_string()),
            Err(_) => {
                debug!(
                    info_hash = ?extract_info_hash(magnet),
                    "Conversion still running, continuing in background"
                );
                ConversionOutcome::Pending
            }
        }
    }

    /// Number of conversions currently running.
    pub fn in_flight(&self) -> usize {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Serve from cache, join a running conversion or start a new one.
    fn begin(&self, key: ConversionKey) -> Conversion {
        if let Some(url) = self.cache.get(&key) {
            CONVERSIONS_TOTAL.with_label_values(&["cached"]).inc();
            return Conversion::Ready(url);
        }

        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        // A marker is cleared before its outcome is published, so a marker
        // that already holds an outcome belongs to a finished conversion.
        if let Some(rx) = in_flight.get(&key).filter(|rx| rx.borrow().is_none()) {
            CONVERSIONS_TOTAL.with_label_values(&["joined"]).inc();
            return Conversion::Running(rx.clone());
        }

        // A task writes the cache before clearing its marker, so re-checking
        // under the lock cannot miss a conversion that just finished.
        if let Some(url) = self.cache.get(&key) {
            CONVERSIONS_TOTAL.with_label_values(&["cached"]).inc();
            return Conversion::Ready(url);
        }

        let (tx, rx) = watch::channel(None);
        in_flight.insert(key.clone(), rx.clone());
        drop(in_flight);

        self.spawn_conversion(key, tx);
        Conversion::Running(rx)
    }

    fn spawn_conversion(&self, key: ConversionKey, tx: watch::Sender<Option<ConversionResult>>) {
        let provider = self.provider.clone();
        let cache = self.cache.clone();
        let config = self.config.clone();
        let guard = InFlightGuard {
            in_flight: self.in_flight.clone(),
            key: key.clone(),
            tx: Some(tx),
        };

        tokio::spawn(async move {
            let info_hash = extract_info_hash(&key.magnet).unwrap_or_default();
            let started = Instant::now();

            info!(provider = provider.name(), %info_hash, "Starting conversion");
            let result = run_conversion(provider.as_ref(), &key, &config).await;
            let elapsed = started.elapsed();

            match &result {
                Ok(url) => {
                    info!(%info_hash, elapsed_ms = elapsed.as_millis() as u64, "Conversion ready");
                    cache.set(key.clone(), url.clone());
                    CONVERSIONS_TOTAL.with_label_values(&["success"]).inc();
                    CONVERSION_DURATION
                        .with_label_values(&["success"])
                        .observe(elapsed.as_secs_f64());
                }
                Err(e) => {
                    warn!(%info_hash, error = %e, "Conversion failed");
                    CONVERSIONS_TOTAL.with_label_values(&["failed"]).inc();
                    CONVERSION_DURATION
                        .with_label_values(&["failed"])
                        .observe(elapsed.as_secs_f64());
                }
            }

            guard.publish(result);
        });
    }
}

/// In-flight marker and outcome sender of one running conversion.
///
/// The marker is always removed before waiters can observe an outcome, so
/// a request arriving after a failure starts a fresh conversion. Dropping
/// the guard without publishing (the task panicked) removes the marker and
/// then closes the channel, which waiters read as `Aborted`.
struct InFlightGuard {
    in_flight: InFlight,
    key: ConversionKey,
    tx: Option<watch::Sender<Option<ConversionResult>>>,
}

impl InFlightGuard {
    fn publish(mut self, result: ConversionResult) {
        self.clear_marker();
        if let Some(tx) = self.tx.take() {
            // No receivers left is fine: the outcome is only informational then.
            let _ = tx.send(Some(result));
        }
    }

    fn clear_marker(&self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        // After `publish` the key may already belong to a newer conversion.
        if self.tx.is_some() {
            self.clear_marker();
        }
    }
}

async fn wait_for_outcome(mut rx: watch::Receiver<Option<ConversionResult>>) -> ConversionResult {
    match rx.wait_for(Option::is_some).await {
        Ok(outcome) => outcome.clone().unwrap_or(Err(ConversionError::Aborted)),
        // Sender dropped without publishing: the task panicked.
        Err(_) => Err(ConversionError::Aborted),
    }
}

/// add magnet → inspect files → select all → poll for links → unrestrict.
async fn run_conversion(
    provider: &dyn DebridProvider,
    key: &ConversionKey,
    config: &DebridConfig,
) -> ConversionResult {
    let token = key.account.as_str();

    let id = provider.add_magnet(token, &key.magnet).await?;
    if id.trim().is_empty() {
        return Err(ConversionError::EmptyTorrentId);
    }

    let info = provider.torrent_info(token, &id).await?;
    if info.files.is_empty() {
        return Err(ConversionError::NoFiles);
    }

    let file_ids: Vec<u64> = info.files.iter().map(|f| f.id).collect();
    provider.select_files(token, &id, &file_ids).await?;

    for attempt in 1..=config.max_poll_attempts {
        sleep(config.poll_interval()).await;

        let info = provider.torrent_info(token, &id).await?;
        if let Some(link) = info.links.first() {
            return Ok(provider.unrestrict(token, link).await?);
        }
        debug!(id = %id, attempt, status = %info.status, "Links not ready");
    }

    Err(ConversionError::LinksNotReady {
        attempts: config.max_poll_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::testing::MockDebridProvider;
    use std::time::Duration;

    const MAGNET: &str = "magnet:?xt=urn:btih:0123456789abcdef0123456789abcdef01234567";

    fn fast_config() -> DebridConfig {
        DebridConfig {
            poll_interval_ms: 5,
            max_poll_attempts: 3,
            play_wait_secs: 1,
            ..DebridConfig::default()
        }
    }

    fn coordinator(provider: Arc<MockDebridProvider>, config: DebridConfig) -> ConversionCoordinator {
        ConversionCoordinator::new(
            provider,
            Arc::new(MemoryCache::new("conversions", Duration::from_secs(60))),
            config,
        )
    }

    #[test]
    fn test_has_account() {
        assert!(has_account("token"));
        assert!(!has_account(""));
        assert!(!has_account("  "));
        assert!(!has_account("none"));
        assert!(!has_account("NONE"));
    }

    #[tokio::test]
    async fn test_no_account_returns_magnet_without_calls() {
        let provider = Arc::new(MockDebridProvider::new());
        let coordinator = coordinator(provider.clone(), fast_config());

        assert_eq!(coordinator.convert(MAGNET, "none").await.unwrap(), MAGNET);
        assert_eq!(
            coordinator.play(MAGNET, "").await,
            ConversionOutcome::Ready(MAGNET.to_string())
        );
        assert_eq!(provider.add_magnet_count().await, 0);
    }

    #[tokio::test]
    async fn test_convert_success_is_cached() {
        let provider = Arc::new(MockDebridProvider::new());
        let coordinator = coordinator(provider.clone(), fast_config());

        let url = coordinator.convert(MAGNET, "token").await.unwrap();
        assert!(url.starts_with("https://"));
        assert_eq!(coordinator.in_flight(), 0);

        let again = coordinator.convert(MAGNET, "token").await.unwrap();
        assert_eq!(url, again);
        assert_eq!(provider.add_magnet_count().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_conversion() {
        let provider = Arc::new(MockDebridProvider::new());
        provider.set_polls_until_ready(2).await;
        let coordinator = coordinator(provider.clone(), fast_config());

        let (a, b) = tokio::join!(
            coordinator.convert(MAGNET, "token"),
            coordinator.convert(MAGNET, "token")
        );

        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(provider.add_magnet_count().await, 1);
    }

    #[tokio::test]
    async fn test_accounts_convert_separately() {
        let provider = Arc::new(MockDebridProvider::new());
        let coordinator = coordinator(provider.clone(), fast_config());

        coordinator.convert(MAGNET, "alice").await.unwrap();
        coordinator.convert(MAGNET, "bob").await.unwrap();

        assert_eq!(provider.add_magnet_count().await, 2);
    }

    #[tokio::test]
    async fn test_failure_not_cached_and_retried() {
        let provider = Arc::new(MockDebridProvider::new());
        provider.set_files(Vec::new()).await;
        let coordinator = coordinator(provider.clone(), fast_config());

        let first = coordinator.convert(MAGNET, "token").await;
        assert_eq!(first, Err(ConversionError::NoFiles));
        assert_eq!(coordinator.in_flight(), 0);

        let second = coordinator.convert(MAGNET, "token").await;
        assert_eq!(second, Err(ConversionError::NoFiles));
        assert_eq!(provider.add_magnet_count().await, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_failure_retried_immediately_on_multi_thread_runtime() {
        let provider = Arc::new(MockDebridProvider::new());
        provider.set_files(Vec::new()).await;
        let coordinator = coordinator(provider.clone(), fast_config());

        for round in 1..=100 {
            let first = coordinator.convert(MAGNET, "token").await;
            assert_eq!(first, Err(ConversionError::NoFiles));
            let second = coordinator.convert(MAGNET, "token").await;
            assert_eq!(second, Err(ConversionError::NoFiles));
            assert_eq!(provider.add_magnet_count().await, round * 2);
        }
    }

    #[tokio::test]
    async fn test_panicked_conversion_aborts_and_clears_marker() {
        let provider = Arc::new(MockDebridProvider::new());
        provider.set_polls_until_ready(2).await;
        provider.set_panic_on_unrestrict(true).await;
        let coordinator = coordinator(provider.clone(), fast_config());

        let (a, b) = tokio::join!(
            coordinator.convert(MAGNET, "token"),
            coordinator.convert(MAGNET, "token")
        );
        assert_eq!(a, Err(ConversionError::Aborted));
        assert_eq!(b, Err(ConversionError::Aborted));
        assert_eq!(coordinator.in_flight(), 0);
        assert_eq!(provider.add_magnet_count().await, 1);

        provider.set_panic_on_unrestrict(false).await;
        let url = coordinator.convert(MAGNET, "token").await.unwrap();
        assert!(url.starts_with("https://"));
        assert_eq!(provider.add_magnet_count().await, 2);
    }

    #[tokio::test]
    async fn test_links_never_ready() {
        let provider = Arc::new(MockDebridProvider::new());
        provider.set_polls_until_ready(u32::MAX).await;
        let coordinator = coordinator(provider.clone(), fast_config());

        let result = coordinator.convert(MAGNET, "token").await;
        assert_eq!(result, Err(ConversionError::LinksNotReady { attempts: 3 }));
    }

    #[tokio::test]
    async fn test_play_pending_then_ready_from_background() {
        let provider = Arc::new(MockDebridProvider::new());
        provider.set_polls_until_ready(3).await;
        let config = DebridConfig {
            poll_interval_ms: 400,
            max_poll_attempts: 5,
            play_wait_secs: 1,
            ..DebridConfig::default()
        };
        let coordinator = coordinator(provider.clone(), config);

        assert_eq!(
            coordinator.play(MAGNET, "token").await,
            ConversionOutcome::Pending
        );

        sleep(Duration::from_millis(800)).await;
        match coordinator.play(MAGNET, "token").await {
            ConversionOutcome::Ready(url) => assert!(url.starts_with("https://")),
            other => panic!("expected ready, got {:?}", other),
        }
        assert_eq!(provider.add_magnet_count().await, 1);
    }

    #[tokio::test]
    async fn test_play_reports_failure() {
        let provider = Arc::new(MockDebridProvider::new());
        provider.set_torrent_id("").await;
        let coordinator = coordinator(provider, fast_config());

        assert!(matches!(
            coordinator.play(MAGNET, "token").await,
            ConversionOutcome::Failed(_)
        ));
    }
}
