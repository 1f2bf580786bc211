//! Click-through play route: converts a magnet only when a stream is chosen.

use std::sync::Arc;

use anistream_core::ConversionOutcome;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, warn};

use super::handlers::ErrorResponse;
use crate::metrics::PLAY_OUTCOMES;
use crate::state::AppState;

/// Convert the magnet and redirect to the result.
///
/// Ready redirects to the stream URL, Pending to the placeholder while the
/// conversion keeps running, and a failed conversion answers 502.
pub async fn play(
    State(state): State<Arc<AppState>>,
    Path((account, magnet)): Path<(String, String)>,
) -> Response {
    if !magnet.starts_with("magnet:?") {
        PLAY_OUTCOMES.with_label_values(&["invalid"]).inc();
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Expected a magnet URI")),
        )
            .into_response();
    }

    match state.pipeline().play(&magnet, &account).await {
        ConversionOutcome::Ready(url) => {
            PLAY_OUTCOMES.with_label_values(&["ready"]).inc();
            found(url)
        }
        ConversionOutcome::Pending => {
            PLAY_OUTCOMES.with_label_values(&["pending"]).inc();
            info!("Conversion still running, serving placeholder");
            found(state.addon().placeholder_url())
        }
        ConversionOutcome::Failed(message) => {
            PLAY_OUTCOMES.with_label_values(&["failed"]).inc();
            warn!(error = %message, "Conversion failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::new(format!("Conversion failed: {}", message))),
            )
                .into_response()
        }
    }
}

/// 302 Found, which players follow for media URLs.
fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
