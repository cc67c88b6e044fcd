//! HTTP listener settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Where the gate listens and what it serves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// How long in-flight requests may drain after a shutdown signal.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
    /// Built front-end served behind the gate. Must contain `index.html`.
    #[serde(default = "default_web_root")]
    pub web_root: String,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// `host:port` for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_seconds)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.web_root.trim().is_empty() {
            return Err(AppError::configuration("server.web_root must not be empty"));
        }
        if self.cors.allowed_origins.is_empty() {
            return Err(AppError::configuration(
                "server.cors.allowed_origins must list at least one origin or \"*\"",
            ));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_grace_seconds: default_shutdown_grace(),
            web_root: default_web_root(),
            cors: CorsConfig::default(),
        }
    }
}

/// Cross-origin access to the `/api` endpoints.
///
/// Session cookies are only sent cross-origin when origins are listed
/// explicitly; `"*"` allows anonymous requests only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_allowed_methods")]
    pub allowed_methods: Vec<String>,
    /// Preflight cache lifetime.
    #[serde(default = "default_max_age")]
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            allowed_methods: default_allowed_methods(),
            max_age_seconds: default_max_age(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_shutdown_grace() -> u64 {
    30
}

fn default_web_root() -> String {
    "./web/dist".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_allowed_methods() -> Vec<String> {
    ["GET", "POST", "OPTIONS"].map(String::from).to_vec()
}

fn default_max_age() -> u64 {
    3600
}
