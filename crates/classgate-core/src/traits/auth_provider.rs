//! External auth service abstraction.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::session::{SessionInfo, SessionToken};

/// The identity provider that issues, extends, and revokes sessions.
///
/// Credential verification and token issuance live behind this trait; the
/// access gate and the session refresher depend only on these three calls.
/// Implementations must bound every call in time and surface a timeout as an
/// error rather than retrying.
#[async_trait]
pub trait AuthProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Validate the token, refreshing it if the provider chooses to.
    ///
    /// Returns `Ok(None)` when the token does not represent a live session,
    /// and `Err` when the provider could not answer.
    async fn validate_or_refresh_session(
        &self,
        token: &SessionToken,
    ) -> AppResult<Option<SessionInfo>>;

    /// Issue an extended session (new token pair) for a live token.
    async fn issue_extended_session(&self, token: &SessionToken) -> AppResult<SessionInfo>;

    /// Revoke the session represented by the token.
    async fn invalidate_session(&self, token: &SessionToken) -> AppResult<()>;
}
