//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Title resolution (per namespace)
//! - Torrent discovery (queries, candidates)
//! - Caches (hits and misses per store)
//! - Debrid conversions (outcomes, duration)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Title Resolution
// =============================================================================

/// Title resolutions by namespace and result.
pub static TITLE_RESOLUTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "anistream_title_resolutions_total",
            "Total title resolutions",
        ),
        &["namespace", "result"], // "resolved", "empty", "cached"
    )
    .unwrap()
});

// =============================================================================
// Discovery
// =============================================================================

/// Individual index queries by result.
pub static SEARCH_QUERIES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("anistream_search_queries_total", "Torrent index queries issued"),
        &["searcher", "result"], // "success", "failed"
    )
    .unwrap()
});

/// Records surviving filtering per discovery.
pub static DISCOVERY_CANDIDATES: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "anistream_discovery_candidates",
            "Number of ranked candidates per discovery",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0]),
    )
    .unwrap()
});

// =============================================================================
// Caches
// =============================================================================

/// Cache lookups by store and result.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("anistream_cache_lookups_total", "Cache lookups"),
        &["cache", "result"], // "hit", "miss"
    )
    .unwrap()
});

// =============================================================================
// Debrid Conversion
// =============================================================================

/// Conversions by outcome.
pub static CONVERSIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("anistream_conversions_total", "Debrid conversions"),
        &["result"], // "cached", "joined", "success", "failed"
    )
    .unwrap()
});

/// Conversion duration in seconds, measured inside the background task.
pub static CONVERSION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "anistream_conversion_duration_seconds",
            "Duration of debrid conversions",
        )
        .buckets(vec![0.5, 1.0, 2.5, 5.0, 8.0, 12.0, 20.0, 30.0, 60.0]),
        &["result"],
    )
    .unwrap()
});

/// Get all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Resolution
        Box::new(TITLE_RESOLUTIONS.clone()),
        // Discovery
        Box::new(SEARCH_QUERIES.clone()),
        Box::new(DISCOVERY_CANDIDATES.clone()),
        // Caches
        Box::new(CACHE_LOOKUPS.clone()),
        // Conversion
        Box::new(CONVERSIONS_TOTAL.clone()),
        Box::new(CONVERSION_DURATION.clone()),
    ]
}
