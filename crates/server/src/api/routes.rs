use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::middleware::metrics_middleware;
use super::{addon, handlers, play};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Service routes
    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        // Addon protocol, with and without a debrid account segment
        .route("/manifest.json", get(addon::manifest))
        .route("/{account}/manifest.json", get(addon::manifest))
        .route("/stream/{kind}/{id}", get(addon::streams))
        .route("/{account}/stream/{kind}/{id}", get(addon::account_streams))
        // Click-through conversion
        .route("/{account}/play/{magnet}", get(play::play))
        .route("/placeholder", get(handlers::placeholder))
        .route_layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
