use super::{types::Config, ConfigError, SearcherBackend};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Public URL is an http(s) URL
/// - Stream limit, cache lifetimes and poll attempts are non-zero
/// - Match score threshold is within [0, 1]
/// - Jackett backend has a section with an API key
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(invalid("server.port cannot be 0"));
    }

    // Addon validation
    let public_url = &config.addon.public_url;
    if !(public_url.starts_with("http://") || public_url.starts_with("https://")) {
        return Err(invalid(&format!(
            "addon.public_url must start with http:// or https://, got '{}'",
            public_url
        )));
    }
    if config.addon.max_streams == 0 {
        return Err(invalid("addon.max_streams cannot be 0"));
    }

    // Cache validation
    let cache = &config.cache;
    for (name, value) in [
        ("cache.titles_ttl_secs", cache.titles_ttl_secs),
        ("cache.search_ttl_secs", cache.search_ttl_secs),
        ("cache.conversion_ttl_secs", cache.conversion_ttl_secs),
        ("cache.metadata_ttl_secs", cache.metadata_ttl_secs),
        ("cache.sweep_interval_secs", cache.sweep_interval_secs),
    ] {
        if value == 0 {
            return Err(invalid(&format!("{} cannot be 0", name)));
        }
    }

    // Resolver validation
    let score = config.resolver.min_match_score;
    if !(0.0..=1.0).contains(&score) {
        return Err(invalid(&format!(
            "resolver.min_match_score must be within [0, 1], got {}",
            score
        )));
    }

    // Searcher validation
    if config.searcher.backend == SearcherBackend::Jackett {
        match &config.searcher.jackett {
            None => {
                return Err(invalid(
                    "searcher.backend is 'jackett' but [searcher.jackett] is missing",
                ))
            }
            Some(jackett) if jackett.api_key.is_empty() => {
                return Err(invalid("searcher.jackett.api_key cannot be empty"))
            }
            Some(_) => {}
        }
    }

    // Debrid validation
    if config.debrid.max_poll_attempts == 0 {
        return Err(invalid("debrid.max_poll_attempts cannot be 0"));
    }

    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}
