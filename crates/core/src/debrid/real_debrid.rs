//! Real-Debrid REST client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use super::config::DebridConfig;
use super::{DebridError, DebridFile, DebridProvider, DebridTorrentInfo};

/// Real-Debrid API client. The account key is used as bearer token.
pub struct RealDebridClient {
    client: Client,
    base_url: String,
}

impl RealDebridClient {
    pub fn new(config: &DebridConfig) -> Result<Self, DebridError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Send an authenticated request and map error statuses.
    async fn send(&self, request: RequestBuilder, token: &str) -> Result<Response, DebridError> {
        let response = request.bearer_auth(token).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<RdError>(&body)
            .map(|e| e.error)
            .unwrap_or(body);

        match status.as_u16() {
            401 | 403 => Err(DebridError::AuthenticationFailed(message)),
            429 => {
                warn!("Real-Debrid rate limit exceeded");
                Err(DebridError::RateLimitExceeded)
            }
            code => Err(DebridError::ApiError {
                status: code,
                message,
            }),
        }
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, DebridError> {
        response
            .json()
            .await
            .map_err(|e| DebridError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl DebridProvider for RealDebridClient {
    fn name(&self) -> &str {
        "real-debrid"
    }

    async fn add_magnet(&self, token: &str, magnet: &str) -> Result<String, DebridError> {
        let request = self
            .client
            .post(self.url("/torrents/addMagnet"))
            .form(&[("magnet", magnet)]);
        let added: RdAddMagnet = Self::json(self.send(request, token).await?).await?;

        debug!(id = %added.id, "Real-Debrid magnet added");
        Ok(added.id)
    }

    async fn torrent_info(&self, token: &str, id: &str) -> Result<DebridTorrentInfo, DebridError> {
        let request = self.client.get(self.url(&format!("/torrents/info/{}", id)));
        let info: RdTorrentInfo = Self::json(self.send(request, token).await?).await?;
        Ok(info.into())
    }

    async fn select_files(
        &self,
        token: &str,
        id: &str,
        file_ids: &[u64],
    ) -> Result<(), DebridError> {
        let files = file_ids
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let request = self
            .client
            .post(self.url(&format!("/torrents/selectFiles/{}", id)))
            .form(&[("files", files.as_str())]);
        self.send(request, token).await?;
        Ok(())
    }

    async fn unrestrict(&self, token: &str, link: &str) -> Result<String, DebridError> {
        let request = self
            .client
            .post(self.url("/unrestrict/link"))
            .form(&[("link", link)]);
        let unrestricted: RdUnrestrict = Self::json(self.send(request, token).await?).await?;
        Ok(unrestricted.download)
    }
}

// ============================================================================
// Real-Debrid API response types (internal)
// ============================================================================

#[derive(Debug, Deserialize)]
struct RdError {
    error: String,
}

#[derive(Debug, Deserialize)]
struct RdAddMagnet {
    #[serde(default)]
    id: String,
}

#[derive(Debug, Deserialize)]
struct RdTorrentInfo {
    id: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    files: Vec<RdFile>,
    #[serde(default)]
    links: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RdFile {
    id: u64,
    #[serde(default)]
    path: String,
    #[serde(default)]
    bytes: u64,
}

#[derive(Debug, Deserialize)]
struct RdUnrestrict {
    download: String,
}

impl From<RdTorrentInfo> for DebridTorrentInfo {
    fn from(info: RdTorrentInfo) -> Self {
        Self {
            id: info.id,
            status: info.status,
            files: info
                .files
                .into_iter()
                .map(|f| DebridFile {
                    id: f.id,
                    path: f.path,
                    bytes: f.bytes,
                })
                .collect(),
            links: info.links,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_torrent_info() {
        let json = r#"{
            "id": "ABCDEF",
            "filename": "Show - 01.mkv",
            "hash": "0123456789abcdef0123456789abcdef01234567",
            "bytes": 1468006400,
            "status": "downloaded",
            "files": [
                { "id": 1, "path": "/Show - 01.mkv", "bytes": 1468006400, "selected": 1 },
                { "id": 2, "path": "/Show - 01.ass", "bytes": 40000, "selected": 1 }
            ],
            "links": ["https://real-debrid.com/d/XYZ"]
        }"#;

        let info: DebridTorrentInfo = serde_json::from_str::<RdTorrentInfo>(json).unwrap().into();

        assert_eq!(info.id, "ABCDEF");
        assert_eq!(info.status, "downloaded");
        assert_eq!(info.files.len(), 2);
        assert_eq!(info.files[1].path, "/Show - 01.ass");
        assert_eq!(info.links, vec!["https://real-debrid.com/d/XYZ"]);
    }

    #[test]
    fn test_parse_torrent_info_before_selection() {
        let json = r#"{ "id": "ABCDEF", "status": "waiting_files_selection" }"#;
        let info: DebridTorrentInfo = serde_json::from_str::<RdTorrentInfo>(json).unwrap().into();

        assert!(info.files.is_empty());
        assert!(info.links.is_empty());
    }

    #[test]
    fn test_parse_error_body() {
        let err: RdError =
            serde_json::from_str(r#"{ "error": "bad_token", "error_code": 8 }"#).unwrap();
        assert_eq!(err.error, "bad_token");
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let client = RealDebridClient::new(&DebridConfig {
            base_url: "https://api.example.com/rest/1.0/".to_string(),
            ..DebridConfig::default()
        })
        .unwrap();
        assert_eq!(
            client.url("/torrents/addMagnet"),
            "https://api.example.com/rest/1.0/torrents/addMagnet"
        );
    }
}
