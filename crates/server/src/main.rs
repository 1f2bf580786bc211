use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use anistream_core::{
    config::SearcherConfig, load_config, load_config_from_env,
    spawn_sweeper, validate_config, CinemetaClient, Collaborators, Config, ConfigError,
    JackettSearcher, KitsuClient, NyaaSearcher, PipelineCaches, RealDebridClient, Searcher,
    SearcherBackend, StreamPipeline,
};
use anistream_server::api::create_router;
use anistream_server::state::AppState;

/// Environment variable naming the configuration file.
const CONFIG_PATH_VAR: &str = "ANISTREAM_CONFIG";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load(&config_path())?;
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Searcher backend: {}", config.searcher.backend.as_str());
    info!("Public URL: {}", config.addon.public_url);

    // Collaborators
    let collaborators = Collaborators {
        catalog: Arc::new(
            KitsuClient::new(config.metadata.kitsu.clone())
                .context("Failed to create Kitsu client")?,
        ),
        canonical: Arc::new(
            CinemetaClient::new(config.metadata.cinemeta.clone())
                .context("Failed to create Cinemeta client")?,
        ),
        searcher: build_searcher(&config.searcher)?,
        debrid: Arc::new(
            RealDebridClient::new(&config.debrid).context("Failed to create debrid client")?,
        ),
    };

    // Pipeline and its caches
    let caches = PipelineCaches::in_memory(&config.cache);
    let pipeline = Arc::new(StreamPipeline::from_config(collaborators, &caches, &config));
    let sweeper = spawn_sweeper(caches.sweepers(), config.cache.sweep_interval());
    info!(
        interval_secs = config.cache.sweep_interval_secs,
        "Cache sweeper started"
    );

    let state = Arc::new(AppState::new(config.clone(), pipeline, caches));
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    sweeper.abort();

    Ok(())
}

fn config_path() -> PathBuf {
    std::env::var(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"))
}

/// Load the config file, falling back to defaults plus environment when it is absent.
fn load(path: &Path) -> Result<Config> {
    info!("Loading configuration from {:?}", path);
    match load_config(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            warn!(
                "Config file {:?} not found, using defaults and environment",
                path
            );
            load_config_from_env().context("Failed to load config from environment")
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load config from {:?}", path)),
    }
}

fn build_searcher(config: &SearcherConfig) -> Result<Arc<dyn Searcher>> {
    match config.backend {
        SearcherBackend::Nyaa => {
            info!("Initializing Nyaa searcher at {}", config.nyaa.base_url);
            Ok(Arc::new(
                NyaaSearcher::new(config.nyaa.clone()).context("Failed to create Nyaa searcher")?,
            ))
        }
        SearcherBackend::Jackett => {
            let jackett = config
                .jackett
                .clone()
                .context("Jackett backend selected but no jackett config provided")?;
            info!("Initializing Jackett searcher at {}", jackett.url);
            Ok(Arc::new(
                JackettSearcher::new(jackett).context("Failed to create Jackett searcher")?,
            ))
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
