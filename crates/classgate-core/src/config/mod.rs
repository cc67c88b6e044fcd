//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth_service;
pub mod logging;
pub mod routes;
pub mod session;
pub mod store;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth_service::AuthServiceConfig;
pub use self::logging::{LogFormat, LoggingConfig};
pub use self::routes::RoutesConfig;
pub use self::session::{SessionConfig, SessionCookieConfig};
pub use self::store::{FileStoreConfig, StoreConfig};

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// External auth service settings.
    #[serde(default)]
    pub auth_service: AuthServiceConfig,
    /// Session timeout and cookie settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Route tables and redirect targets.
    #[serde(default)]
    pub routes: RoutesConfig,
    /// Client persistence settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `CLASSGATE__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false));

        Self::build(builder)
    }

    /// Load configuration from a single file plus the environment overlay.
    pub fn from_file(path: &str) -> Result<Self, AppError> {
        let builder =
            config::Config::builder().add_source(config::File::with_name(path).required(true));

        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, AppError> {
        let config = builder
            .add_source(
                config::Environment::with_prefix("CLASSGATE")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("routes.public")
                    .with_list_parse_key("routes.auth_callback")
                    .with_list_parse_key("routes.onboarding")
                    .with_list_parse_key("routes.protected")
                    .with_list_parse_key("routes.excluded_prefixes")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        app_config.validate()?;
        Ok(app_config)
    }

    /// Checks cross-field invariants that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        self.session.validate()?;
        self.routes.validate()?;
        self.server.validate()?;
        self.logging.validate()?;

        if self.auth_service.base_url.trim().is_empty() {
            return Err(AppError::configuration("auth_service.base_url must not be empty"));
        }
        if self.auth_service.request_timeout_ms == 0 {
            return Err(AppError::configuration(
                "auth_service.request_timeout_ms must be greater than zero",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.session.timeout_seconds, 1800);
        assert_eq!(config.session.warning_lead_seconds, 300);
    }

    #[test]
    fn test_rejects_lead_not_below_timeout() {
        let mut config = AppConfig::default();
        config.session.warning_lead_seconds = config.session.timeout_seconds;
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn test_rejects_relative_route_prefix() {
        let mut config = AppConfig::default();
        config.routes.protected.push("courses".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_request_timeout() {
        let mut config = AppConfig::default();
        config.auth_service.request_timeout_ms = 0;
        assert!(config.validate().is_err());
    }
}
