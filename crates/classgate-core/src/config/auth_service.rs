//! External auth service configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where and how to reach the identity provider that issues sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthServiceConfig {
    /// Base URL of the session API, e.g. `https://auth.example.com/v1`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Optional project API key sent as the `apikey` header.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Per-request timeout in milliseconds. A timed-out call counts as failed.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

impl AuthServiceConfig {
    /// Per-request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            request_timeout_ms: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:54321/auth/v1".to_string()
}

fn default_request_timeout() -> u64 {
    5000
}
