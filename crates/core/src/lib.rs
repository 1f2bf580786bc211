pub mod cache;
pub mod config;
pub mod debrid;
pub mod discovery;
pub mod heuristics;
pub mod media;
pub mod metadata;
pub mod metrics;
pub mod pipeline;
pub mod resolver;
pub mod searcher;
pub mod testing;

pub use cache::{spawn_sweeper, sweep_all, CacheStore, MemoryCache, Sweep};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, SanitizedConfig, SearcherBackend,
};
pub use debrid::{
    ConversionCoordinator, ConversionError, ConversionOutcome, DebridProvider, RealDebridClient,
};
pub use discovery::{DiscoveryEngine, SearchKey};
pub use media::{MediaId, MediaIdError, MediaKind};
pub use metadata::{AnimeCatalog, CanonicalTitleSource, CinemetaClient, KitsuClient};
pub use pipeline::{Collaborators, PipelineCaches, StreamCandidate, StreamPipeline, StreamRequest};
pub use resolver::{TitleResolution, TitleResolver};
pub use searcher::{JackettSearcher, NyaaSearcher, SearchError, Searcher, TorrentRecord};
