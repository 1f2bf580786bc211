//! Debrid configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Debrid provider and conversion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebridConfig {
    /// REST API base URL (default: https://api.real-debrid.com/rest/1.0).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u32,
    /// Delay between torrent status polls.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Status polls before a conversion gives up.
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
    /// How long a play request waits before handing out the placeholder.
    #[serde(default = "default_play_wait_secs")]
    pub play_wait_secs: u64,
}

impl DebridConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn play_wait(&self) -> Duration {
        Duration::from_secs(self.play_wait_secs)
    }
}

fn default_base_url() -> String {
    "https://api.real-debrid.com/rest/1.0".to_string()
}

fn default_timeout_secs() -> u32 {
    10
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_max_poll_attempts() -> u32 {
    10
}

fn default_play_wait_secs() -> u64 {
    8
}

impl Default for DebridConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
            play_wait_secs: default_play_wait_secs(),
        }
    }
}
