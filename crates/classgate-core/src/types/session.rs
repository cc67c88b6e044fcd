//! Token material exchanged with the external auth service.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The opaque token pair a client presents to prove its session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    /// Short-lived access token.
    pub access_token: String,
    /// Refresh token, when the provider issued one.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl SessionToken {
    /// Creates a token pair.
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
        }
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("access_token", &"[redacted]")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish()
    }
}

/// A live session as reported by the auth service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Identity-provider user identifier.
    pub user_id: String,
    /// Current access token (may differ from the one presented if rotated).
    pub access_token: String,
    /// Current refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Access token expiry, when the provider reports it.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionInfo {
    /// The token pair carried by this session.
    pub fn token(&self) -> SessionToken {
        SessionToken {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }

    /// Whether the provider handed back a different token pair than `presented`.
    pub fn rotated_from(&self, presented: &SessionToken) -> bool {
        self.access_token != presented.access_token
            || (self.refresh_token.is_some() && self.refresh_token != presented.refresh_token)
    }
}

impl fmt::Debug for SessionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionInfo")
            .field("user_id", &self.user_id)
            .field("access_token", &"[redacted]")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(access: &str, refresh: Option<&str>) -> SessionInfo {
        SessionInfo {
            user_id: "u-1".to_string(),
            access_token: access.to_string(),
            refresh_token: refresh.map(String::from),
            expires_at: None,
        }
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let token = SessionToken::new("secret-access", Some("secret-refresh".to_string()));
        let rendered = format!("{token:?} {:?}", info("secret-access", None));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_rotation_detection() {
        let presented = SessionToken::new("a1", Some("r1".to_string()));
        assert!(!info("a1", Some("r1")).rotated_from(&presented));
        assert!(!info("a1", None).rotated_from(&presented));
        assert!(info("a2", Some("r1")).rotated_from(&presented));
        assert!(info("a1", Some("r2")).rotated_from(&presented));
    }
}
