//! Session Refresher: the explicit "stay signed in" action.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use classgate_core::error::AppError;
use classgate_core::traits::auth_provider::AuthProvider;
use classgate_core::types::session::SessionInfo;

use crate::store::SessionStore;

/// A successful extension.
#[derive(Debug, Clone)]
pub struct Extended {
    /// The session issued by the auth service.
    pub session: SessionInfo,
    /// The new `lastActivityAt`.
    pub at: DateTime<Utc>,
}

/// The extension could not be obtained. Never retried.
#[derive(Debug, Clone, Error)]
#[error("session refresh failed: {0}")]
pub struct RefreshFailed(#[source] pub AppError);

/// Requests an extended session and restarts the inactivity clock.
#[derive(Debug, Clone)]
pub struct SessionRefresher {
    store: Arc<SessionStore>,
    provider: Arc<dyn AuthProvider>,
    timeout: Duration,
}

impl SessionRefresher {
    /// Creates a refresher whose provider call is bounded by `timeout`.
    pub fn new(store: Arc<SessionStore>, provider: Arc<dyn AuthProvider>, timeout: Duration) -> Self {
        Self {
            store,
            provider,
            timeout,
        }
    }

    /// Exchanges the current token pair for an extended one.
    ///
    /// On success the new pair replaces the old one and `lastActivityAt` is
    /// set to now. Service errors, timeouts and a missing token all fail.
    pub async fn refresh(&self) -> Result<Extended, RefreshFailed> {
        let token = self
            .store
            .token()
            .ok_or_else(|| RefreshFailed(AppError::session("No session token to extend")))?;

        let call = self.provider.issue_extended_session(&token);
        let session = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(session)) => session,
            Ok(Err(e)) => {
                warn!(error = %e, "Auth service refused to extend session");
                return Err(RefreshFailed(e));
            }
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "Session extension timed out");
                return Err(RefreshFailed(AppError::timeout(format!(
                    "Session extension did not complete within {}ms",
                    self.timeout.as_millis()
                ))));
            }
        };

        let at = self.store.extend(session.token()).map_err(RefreshFailed)?;
        info!(user_id = %session.user_id, "Session extended");
        Ok(Extended { session, at })
    }
}
