//! Session timeout and cookie configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Inactivity timeout configuration shared by the client watchdog and the
/// server cookie settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Inactivity in seconds after which the session dies.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Seconds before expiry at which the warning countdown starts.
    /// Must be strictly less than `timeout_seconds`.
    #[serde(default = "default_warning_lead")]
    pub warning_lead_seconds: u64,
    /// Watchdog poll interval in milliseconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Minimum spacing between persisted activity writes (0 = every event).
    /// Must be shorter than the warning threshold.
    #[serde(default)]
    pub activity_write_interval_ms: u64,
    /// Key under which `lastActivityAt` is persisted in the client store.
    #[serde(default = "default_activity_key")]
    pub activity_key: String,
    /// Session cookie settings.
    #[serde(default)]
    pub cookie: SessionCookieConfig,
}

/// Cookies carrying the auth service's token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCookieConfig {
    /// Cookie holding the access token.
    #[serde(default = "default_access_cookie")]
    pub access_token_name: String,
    /// Cookie holding the refresh token.
    #[serde(default = "default_refresh_cookie")]
    pub refresh_token_name: String,
    /// Whether cookies are marked `Secure`.
    #[serde(default = "default_true")]
    pub secure: bool,
    /// Cookie lifetime in days.
    #[serde(default = "default_max_age_days")]
    pub max_age_days: i64,
}

impl SessionConfig {
    /// Inactivity timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Warning lead time.
    pub fn warning_lead(&self) -> Duration {
        Duration::from_secs(self.warning_lead_seconds)
    }

    /// Elapsed inactivity at which the warning starts (`timeout - lead`).
    pub fn warning_threshold(&self) -> Duration {
        self.timeout().saturating_sub(self.warning_lead())
    }

    /// Watchdog poll interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Minimum spacing between persisted activity writes.
    pub fn activity_write_interval(&self) -> Duration {
        Duration::from_millis(self.activity_write_interval_ms)
    }

    /// Validates the timeout invariants.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.timeout_seconds == 0 {
            return Err(AppError::configuration(
                "session.timeout_seconds must be greater than zero",
            ));
        }
        if self.warning_lead_seconds >= self.timeout_seconds {
            return Err(AppError::configuration(format!(
                "session.warning_lead_seconds ({}) must be less than session.timeout_seconds ({})",
                self.warning_lead_seconds, self.timeout_seconds
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(AppError::configuration(
                "session.poll_interval_ms must be greater than zero",
            ));
        }
        if self.warning_lead_seconds > 0 && self.poll_interval() > self.warning_lead() {
            return Err(AppError::configuration(
                "session.poll_interval_ms must not exceed the warning lead time",
            ));
        }
        if self.activity_write_interval() >= self.warning_threshold() {
            return Err(AppError::configuration(
                "session.activity_write_interval_ms must be shorter than the timeout minus the warning lead",
            ));
        }
        if self.activity_key.trim().is_empty() {
            return Err(AppError::configuration(
                "session.activity_key must not be empty",
            ));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            warning_lead_seconds: default_warning_lead(),
            poll_interval_ms: default_poll_interval(),
            activity_write_interval_ms: 0,
            activity_key: default_activity_key(),
            cookie: SessionCookieConfig::default(),
        }
    }
}

impl Default for SessionCookieConfig {
    fn default() -> Self {
        Self {
            access_token_name: default_access_cookie(),
            refresh_token_name: default_refresh_cookie(),
            secure: true,
            max_age_days: default_max_age_days(),
        }
    }
}

fn default_timeout() -> u64 {
    30 * 60
}

fn default_warning_lead() -> u64 {
    5 * 60
}

fn default_poll_interval() -> u64 {
    1000
}

fn default_activity_key() -> String {
    "classgate.lastActivityAt".to_string()
}

fn default_access_cookie() -> String {
    "cg_access_token".to_string()
}

fn default_refresh_cookie() -> String {
    "cg_refresh_token".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_age_days() -> i64 {
    7
}
