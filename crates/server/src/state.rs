use std::sync::Arc;

use anistream_core::{config::AddonConfig, Config, PipelineCaches, SanitizedConfig, StreamPipeline};

/// Shared application state
pub struct AppState {
    config: Config,
    pipeline: Arc<StreamPipeline>,
    caches: PipelineCaches,
}

impl AppState {
    pub fn new(config: Config, pipeline: Arc<StreamPipeline>, caches: PipelineCaches) -> Self {
        Self {
            config,
            pipeline,
            caches,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn addon(&self) -> &AddonConfig {
        &self.config.addon
    }

    pub fn pipeline(&self) -> &StreamPipeline {
        &self.pipeline
    }

    pub fn caches(&self) -> &PipelineCaches {
        &self.caches
    }
}
