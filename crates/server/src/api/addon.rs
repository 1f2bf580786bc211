//! Addon protocol routes: the manifest and per-item stream listings.

use std::sync::Arc;

use anistream_core::{debrid::NO_ACCOUNT, MediaKind, StreamCandidate, StreamRequest};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::debug;

use super::handlers::ErrorResponse;
use crate::metrics::STREAM_REQUESTS;
use crate::state::AppState;

/// Addon identifier announced in the manifest.
pub const ADDON_ID: &str = "org.anistream.addon";

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: &'static str,
    pub version: &'static str,
    pub name: String,
    pub description: &'static str,
    pub resources: Vec<&'static str>,
    pub types: Vec<&'static str>,
    pub id_prefixes: Vec<&'static str>,
    pub catalogs: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct StreamsResponse {
    pub streams: Vec<StreamEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamEntry {
    pub name: String,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavior_hints: Option<BehaviorHints>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorHints {
    /// Streams sharing a group are preferred when the next episode autoplays.
    pub binge_group: String,
}

impl From<StreamCandidate> for StreamEntry {
    fn from(candidate: StreamCandidate) -> Self {
        let behavior_hints = (!candidate.is_placeholder()).then(|| BehaviorHints {
            binge_group: candidate.name.replace(' ', "-").to_lowercase(),
        });

        Self {
            name: candidate.name,
            title: candidate.title,
            url: candidate.url,
            behavior_hints,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Addon manifest. Served the same with or without an account segment.
pub async fn manifest(State(state): State<Arc<AppState>>) -> Json<Manifest> {
    Json(Manifest {
        id: ADDON_ID,
        version: VERSION,
        name: state.addon().name.clone(),
        description: "Anime torrent streams, optionally converted through a debrid account",
        resources: vec!["stream"],
        types: vec!["series", "movie"],
        id_prefixes: vec!["kitsu:", "tt"],
        catalogs: Vec::new(),
    })
}

/// Streams for an item without a debrid account.
pub async fn streams(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<StreamsResponse>, (StatusCode, Json<ErrorResponse>)> {
    list_streams(&state, NO_ACCOUNT, &kind, &id).await
}

/// Streams for an item, with play links bound to the given account.
pub async fn account_streams(
    State(state): State<Arc<AppState>>,
    Path((account, kind, id)): Path<(String, String, String)>,
) -> Result<Json<StreamsResponse>, (StatusCode, Json<ErrorResponse>)> {
    list_streams(&state, &account, &kind, &id).await
}

async fn list_streams(
    state: &AppState,
    account: &str,
    kind: &str,
    id: &str,
) -> Result<Json<StreamsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let kind: MediaKind = kind.parse().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!("Unsupported type: {}", kind))),
        )
    })?;
    let id = id.strip_suffix(".json").unwrap_or(id);

    let request = StreamRequest::from_id(kind, id, account);
    let candidates = state.pipeline().resolve_stream(&request).await;

    let found = !candidates.iter().any(StreamCandidate::is_placeholder);
    STREAM_REQUESTS
        .with_label_values(&[kind.as_str(), if found { "found" } else { "placeholder" }])
        .inc();
    debug!(%kind, id, streams = candidates.len(), "Stream listing served");

    Ok(Json(StreamsResponse {
        streams: candidates.into_iter().map(StreamEntry::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_entry_binge_group() {
        let entry = StreamEntry::from(StreamCandidate {
            name: "anistream 1080p".to_string(),
            title: "Show - 01".to_string(),
            url: "magnet:?xt=urn:btih:abc".to_string(),
            info_hash: Some("abc".to_string()),
        });

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["behaviorHints"]["bingeGroup"], "anistream-1080p");
    }

    #[test]
    fn test_placeholder_entry_has_no_hints() {
        let entry = StreamEntry::from(StreamCandidate {
            name: "anistream".to_string(),
            title: "No torrents found for this item".to_string(),
            url: "http://127.0.0.1:8080/placeholder".to_string(),
            info_hash: None,
        });

        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("behaviorHints").is_none());
    }
}
