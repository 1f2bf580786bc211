//! Common test utilities for addon route testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock collaborators injected, so every route can be exercised
//! without network access.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use anistream_core::{
    metadata::AnimeFormat,
    testing::{MockAnimeCatalog, MockCanonicalTitles, MockDebridProvider, MockSearcher},
    Collaborators, Config, PipelineCaches, StreamPipeline,
};
use anistream_server::state::AppState;

/// Re-export fixtures for test convenience
pub use anistream_core::testing::fixtures;

/// Public URL the fixture's play links are built from.
pub const PUBLIC_URL: &str = "https://streams.example.org";

/// Test fixture with mock collaborators behind the real router.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_manifest() {
///     let fixture = TestFixture::new();
///
///     let response = fixture.get("/manifest.json").await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock anime catalog - configure Kitsu entries and searches
    pub catalog: Arc<MockAnimeCatalog>,
    /// Mock canonical titles - configure Cinemeta names
    pub canonical: Arc<MockCanonicalTitles>,
    /// Mock searcher - configure index results
    pub searcher: Arc<MockSearcher>,
    /// Mock debrid provider - control conversions
    pub debrid: Arc<MockDebridProvider>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// JSON body, a string for plain-text bodies, or null when empty.
    pub body: Value,
    /// `Location` header, for redirects.
    pub location: Option<String>,
}

impl TestFixture {
    /// Create a fixture with fast debrid polling.
    pub fn new() -> Self {
        Self::with_config(Self::default_config())
    }

    /// Configuration used by [`TestFixture::new`].
    pub fn default_config() -> Config {
        let mut config = Config::default();
        config.addon.public_url = PUBLIC_URL.to_string();
        config.debrid.poll_interval_ms = 10;
        config.debrid.max_poll_attempts = 5;
        config.debrid.play_wait_secs = 2;
        config
    }

    /// Create a fixture with custom configuration.
    pub fn with_config(config: Config) -> Self {
        let catalog = Arc::new(MockAnimeCatalog::new());
        let canonical = Arc::new(MockCanonicalTitles::new());
        let searcher = Arc::new(MockSearcher::new());
        let debrid = Arc::new(MockDebridProvider::new());

        let collaborators = Collaborators {
            catalog: catalog.clone(),
            canonical: canonical.clone(),
            searcher: searcher.clone(),
            debrid: debrid.clone(),
        };
        let caches = PipelineCaches::in_memory(&config.cache);
        let pipeline = Arc::new(StreamPipeline::from_config(collaborators, &caches, &config));

        let state = Arc::new(AppState::new(config, pipeline, caches));
        let router = anistream_server::api::create_router(state);

        Self {
            router,
            catalog,
            canonical,
            searcher,
            debrid,
        }
    }

    /// Seed a Kitsu entry (id 41370) and matching index results for episode 1.
    pub async fn seed_show(&self) {
        self.catalog
            .add_anime(fixtures::anime_entry(
                41370,
                Some("Kimetsu no Yaiba"),
                Some("Demon Slayer"),
                None,
                AnimeFormat::Tv,
                Some(2019),
            ))
            .await;
        self.searcher
            .set_results(vec![
                fixtures::raw_result("[SubsPlease] Kimetsu no Yaiba - 01 (1080p)", 'a', 120),
                fixtures::raw_result("[Erai-raws] Kimetsu no Yaiba - 01 [720p]", 'b', 80),
                fixtures::raw_result("Kimetsu no Yaiba - Recap (1080p)", 'c', 300),
            ])
            .await;
    }

    /// Play path for a magnet under the given account.
    pub fn play_path(account: &str, magnet: &str) -> String {
        format!(
            "/{}/play/{}",
            urlencoding::encode(account),
            urlencoding::encode(magnet)
        )
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&body_bytes).into_owned())
            })
        };

        TestResponse {
            status,
            body,
            location,
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
