//! The stream pipeline orchestrator.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{AddonConfig, Config};
use crate::debrid::{
    has_account, ConversionCoordinator, ConversionError, ConversionOutcome, DebridProvider,
};
use crate::discovery::DiscoveryEngine;
use crate::heuristics::resolution_tier;
use crate::metadata::{AnimeCatalog, CanonicalTitleSource};
use crate::resolver::TitleResolver;
use crate::searcher::{Searcher, TorrentRecord};

use super::caches::PipelineCaches;
use super::types::{StreamCandidate, StreamRequest};

/// External services the pipeline talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub catalog: Arc<dyn AnimeCatalog>,
    pub canonical: Arc<dyn CanonicalTitleSource>,
    pub searcher: Arc<dyn Searcher>,
    pub debrid: Arc<dyn DebridProvider>,
}

/// Resolves stream requests and converts chosen magnets.
pub struct StreamPipeline {
    resolver: TitleResolver,
    discovery: DiscoveryEngine,
    coordinator: ConversionCoordinator,
    config: AddonConfig,
}

impl StreamPipeline {
    pub fn new(
        resolver: TitleResolver,
        discovery: DiscoveryEngine,
        coordinator: ConversionCoordinator,
        config: AddonConfig,
    ) -> Self {
        Self {
            resolver,
            discovery,
            coordinator,
            config,
        }
    }

    /// Wire every stage from configuration.
    pub fn from_config(
        collaborators: Collaborators,
        caches: &PipelineCaches,
        config: &Config,
    ) -> Self {
        let resolver = TitleResolver::new(
            collaborators.catalog,
            collaborators.canonical,
            caches.resolver(),
            config.resolver.clone(),
        );
        let discovery = DiscoveryEngine::new(
            collaborators.searcher,
            caches.search.clone(),
            config.discovery.clone(),
        );
        let coordinator = ConversionCoordinator::new(
            collaborators.debrid,
            caches.conversions.clone(),
            config.debrid.clone(),
        );

        Self::new(resolver, discovery, coordinator, config.addon.clone())
    }

    pub fn addon_config(&self) -> &AddonConfig {
        &self.config
    }

    /// Conversions currently running in the background.
    pub fn conversions_in_flight(&self) -> usize {
        self.coordinator.in_flight()
    }

    /// Ranked stream candidates for a request.
    ///
    /// Always returns at least one entry: when nothing is found a single
    /// placeholder explains why.
    pub async fn resolve_stream(&self, request: &StreamRequest) -> Vec<StreamCandidate> {
        info!(
            kind = %request.kind,
            id = %request.external_id,
            episode = ?request.episode,
            season = ?request.season,
            "Resolving streams"
        );

        let resolution = self
            .resolver
            .resolve(request.kind, &request.external_id)
            .await;
        if resolution.is_empty() {
            return vec![self.placeholder("No titles found for this item")];
        }

        let records = self
            .discovery
            .discover(&resolution.names, request.episode, request.season)
            .await;
        if records.is_empty() {
            return vec![self.placeholder("No torrents found for this item")];
        }

        let candidates: Vec<StreamCandidate> = records
            .iter()
            .take(self.config.max_streams)
            .map(|record| self.candidate(record, &request.account))
            .collect();

        debug!(
            id = %request.external_id,
            found = records.len(),
            returned = candidates.len(),
            "Streams resolved"
        );
        candidates
    }

    /// Convert a magnet, waiting for the conversion to finish.
    pub async fn convert_magnet(&self, magnet: &str, account: &str) -> Result<String, ConversionError> {
        self.coordinator.convert(magnet, account).await
    }

    /// Convert a magnet with a bounded wait.
    pub async fn play(&self, magnet: &str, account: &str) -> ConversionOutcome {
        self.coordinator.play(magnet, account).await
    }

    fn candidate(&self, record: &TorrentRecord, account: &str) -> StreamCandidate {
        let url = if has_account(account) {
            self.play_url(&record.magnet_uri, account)
        } else {
            record.magnet_uri.clone()
        };

        StreamCandidate {
            name: format!(
                "{} {}",
                self.config.name,
                resolution_tier(&record.name).label()
            ),
            title: format!(
                "{}\nSeeders: {} | Size: {}",
                record.name, record.seeders, record.size_label
            ),
            url,
            info_hash: Some(record.info_hash.clone()),
        }
    }

    /// `<public_url>/<account>/play/<magnet>`, both path segments percent-encoded.
    fn play_url(&self, magnet: &str, account: &str) -> String {
        format!(
            "{}/{}/play/{}",
            self.config.public_url.trim_end_matches('/'),
            urlencoding::encode(account.trim()),
            urlencoding::encode(magnet)
        )
    }

    fn placeholder(&self, message: &str) -> StreamCandidate {
        StreamCandidate {
            name: self.config.name.clone(),
            title: message.to_string(),
            url: self.config.placeholder_url(),
            info_hash: None,
        }
    }
}
