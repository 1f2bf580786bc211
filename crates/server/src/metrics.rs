//! Prometheus metrics for observability.
//!
//! Server-side metrics cover HTTP traffic, addon requests and play outcomes.
//! Cache sizes and running conversions are collected when `/metrics` is
//! scraped. Core pipeline metrics are registered into the same registry.

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry, TextEncoder,
};

use crate::state::AppState;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "anistream_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("anistream_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "anistream_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Addon Metrics
// =============================================================================

/// Stream listings served, by media kind and whether anything was found.
pub static STREAM_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("anistream_stream_requests_total", "Stream listings served"),
        &["kind", "result"],
    )
    .unwrap()
});

/// Play requests by outcome.
pub static PLAY_OUTCOMES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("anistream_play_requests_total", "Play requests by outcome"),
        &["outcome"],
    )
    .unwrap()
});

// =============================================================================
// Pipeline State (collected dynamically)
// =============================================================================

/// Stored entries per cache.
pub static CACHE_ENTRIES: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new("anistream_cache_entries", "Entries currently stored per cache"),
        &["cache"],
    )
    .unwrap()
});

/// Debrid conversions currently running.
pub static CONVERSIONS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "anistream_conversions_in_flight",
        "Number of debrid conversions currently running",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Addon
    registry
        .register(Box::new(STREAM_REQUESTS.clone()))
        .unwrap();
    registry.register(Box::new(PLAY_OUTCOMES.clone())).unwrap();

    // Pipeline state
    registry.register(Box::new(CACHE_ENTRIES.clone())).unwrap();
    registry
        .register(Box::new(CONVERSIONS_IN_FLIGHT.clone()))
        .unwrap();

    // Core metrics (resolver, discovery, caches, conversions)
    for metric in anistream_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so gauges reflect the caches and conversions
/// as they are at scrape time.
pub fn collect_dynamic_metrics(state: &AppState) {
    for (cache, entries) in state.caches().entry_counts() {
        CACHE_ENTRIES
            .with_label_values(&[cache])
            .set(entries as i64);
    }
    CONVERSIONS_IN_FLIGHT.set(state.pipeline().conversions_in_flight() as i64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        // Access metrics to ensure they're initialized
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/test", "200"])
            .inc();

        let output = encode_metrics();
        assert!(output.contains("anistream_http_requests_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_registry_contains_all_metrics() {
        // Prometheus only outputs labelled metrics that have been touched
        HTTP_REQUEST_DURATION
            .with_label_values(&["GET", "/test", "200"])
            .observe(0.1);
        HTTP_REQUESTS_IN_FLIGHT.set(0);
        STREAM_REQUESTS.with_label_values(&["series", "found"]).inc();
        PLAY_OUTCOMES.with_label_values(&["ready"]).inc();
        CACHE_ENTRIES.with_label_values(&["titles"]).set(0);
        CONVERSIONS_IN_FLIGHT.set(0);
        anistream_core::metrics::CONVERSIONS_TOTAL
            .with_label_values(&["success"])
            .inc();

        let output = encode_metrics();

        assert!(output.contains("anistream_http_request_duration_seconds"));
        assert!(output.contains("anistream_http_requests_in_flight"));
        assert!(output.contains("anistream_stream_requests_total"));
        assert!(output.contains("anistream_play_requests_total"));
        assert!(output.contains("anistream_cache_entries"));
        assert!(output.contains("anistream_conversions_in_flight"));
        assert!(output.contains("anistream_conversions_total"));
    }
}
