//! Forced sign-out shared by expiry, refresh failure and the user.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use classgate_core::traits::auth_provider::AuthProvider;
use classgate_core::traits::navigator::Navigator;

use crate::store::SessionStore;

/// Why the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignOutReason {
    Expired,
    RefreshFailed,
    UserRequested,
}

impl fmt::Display for SignOutReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignOutReason::Expired => write!(f, "expired"),
            SignOutReason::RefreshFailed => write!(f, "refresh_failed"),
            SignOutReason::UserRequested => write!(f, "user_requested"),
        }
    }
}

/// Ends the session at most once and sends the client to sign-in.
///
/// The sign-in location never carries a return path.
#[derive(Debug)]
pub struct ForcedSignOut {
    store: Arc<SessionStore>,
    provider: Arc<dyn AuthProvider>,
    navigator: Arc<dyn Navigator>,
    sign_in_path: String,
    timeout: Duration,
    done: AtomicBool,
}

impl ForcedSignOut {
    /// Creates the sign-out path. `timeout` bounds the invalidation call.
    pub fn new(
        store: Arc<SessionStore>,
        provider: Arc<dyn AuthProvider>,
        navigator: Arc<dyn Navigator>,
        sign_in_path: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            provider,
            navigator,
            sign_in_path: sign_in_path.into(),
            timeout,
            done: AtomicBool::new(false),
        }
    }

    /// Whether the sign-out already ran.
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::SeqCst)
    }

    /// Signs out. Returns `false` if a previous call already did.
    ///
    /// Invalidation is best effort: a failure is logged and the client is
    /// still signed out locally and redirected.
    pub async fn sign_out(&self, reason: SignOutReason) -> bool {
        if self.done.swap(true, Ordering::SeqCst) {
            return false;
        }

        if let Some(token) = self.store.take_token() {
            let call = self.provider.invalidate_session(&token);
            match tokio::time::timeout(self.timeout, call).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(reason = %reason, error = %e, "Session invalidation failed"),
                Err(_) => warn!(reason = %reason, "Session invalidation timed out"),
            }
        }

        if let Err(e) = self.store.clear_activity() {
            warn!(error = %e, "Failed to clear activity timestamp");
        }

        info!(reason = %reason, "Signed out");
        self.navigator.navigate(&self.sign_in_path);
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use chrono::DateTime;
    use classgate_core::error::AppError;
    use classgate_core::result::AppResult;
    use classgate_core::types::clock::ManualClock;
    use classgate_core::types::session::{SessionInfo, SessionToken};
    use classgate_store::memory::MemoryStore;

    use super::*;
    use crate::navigator::HistoryNavigator;

    #[derive(Debug, Default)]
    struct StubProvider {
        fail: bool,
        invalidations: AtomicUsize,
    }

    #[async_trait]
    impl AuthProvider for StubProvider {
        async fn validate_or_refresh_session(
            &self,
            _token: &SessionToken,
        ) -> AppResult<Option<SessionInfo>> {
            Ok(None)
        }

        async fn issue_extended_session(&self, _token: &SessionToken) -> AppResult<SessionInfo> {
            Err(AppError::internal("unused"))
        }

        async fn invalidate_session(&self, _token: &SessionToken) -> AppResult<()> {
            self.invalidations.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(AppError::external_service("auth service down"))
            } else {
                Ok(())
            }
        }
    }

    fn setup(fail: bool) -> (ForcedSignOut, Arc<SessionStore>, Arc<StubProvider>, HistoryNavigator) {
        let clock = ManualClock::new(DateTime::from_timestamp(1_700_000_000, 0).unwrap());
        let store = Arc::new(SessionStore::new(
            Arc::new(MemoryStore::new()),
            Arc::new(clock),
            "lastActivityAt",
        ));
        store.begin(SessionToken::new("a1", None)).unwrap();
        let provider = Arc::new(StubProvider {
            fail,
            ..Default::default()
        });
        let navigator = HistoryNavigator::new();
        let signout = ForcedSignOut::new(
            store.clone(),
            provider.clone(),
            Arc::new(navigator.clone()),
            "/sign-in",
            Duration::from_secs(1),
        );
        (signout, store, provider, navigator)
    }

    #[tokio::test]
    async fn test_sign_out_clears_state_and_redirects_without_return_path() {
        let (signout, store, provider, navigator) = setup(false);
        assert!(signout.sign_out(SignOutReason::Expired).await);

        assert!(!store.is_present());
        assert_eq!(store.last_activity().unwrap(), None);
        assert_eq!(provider.invalidations.load(Ordering::SeqCst), 1);
        assert_eq!(navigator.history(), vec!["/sign-in".to_string()]);
    }

    #[tokio::test]
    async fn test_second_call_is_noop() {
        let (signout, _, provider, navigator) = setup(false);
        assert!(signout.sign_out(SignOutReason::RefreshFailed).await);
        assert!(!signout.sign_out(SignOutReason::UserRequested).await);
        assert_eq!(provider.invalidations.load(Ordering::SeqCst), 1);
        assert_eq!(navigator.history().len(), 1);
    }

    #[tokio::test]
    async fn test_invalidation_failure_still_signs_out() {
        let (signout, store, _, navigator) = setup(true);
        assert!(signout.sign_out(SignOutReason::UserRequested).await);
        assert!(!store.is_present());
        assert_eq!(navigator.last().as_deref(), Some("/sign-in"));
    }
}
