//! Per-request gate combining route class and live session state.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use classgate_core::config::AppConfig;
use classgate_core::error::AppError;
use classgate_core::traits::auth_provider::AuthProvider;
use classgate_core::types::session::{SessionInfo, SessionToken};

use crate::route::{RouteClass, RouteTable};

use super::decision::{Decision, decide};
use super::redirect::Redirects;

/// Why the gate could not establish session state.
#[derive(Debug, Clone, Error)]
pub enum GateFault {
    /// The auth service errored or did not answer in time.
    #[error("session query failed: {0}")]
    SessionQueryFailed(#[source] AppError),
}

impl GateFault {
    /// Whether the auth service, rather than this process, caused the fault.
    pub fn is_upstream(&self) -> bool {
        match self {
            GateFault::SessionQueryFailed(e) => e.kind.is_upstream(),
        }
    }
}

/// Result of running the gate for one request.
#[derive(Debug, Clone)]
pub struct GateOutcome {
    /// Route class, or `None` when the path is excluded from classification.
    pub class: Option<RouteClass>,
    /// What to do with the request.
    pub decision: Decision,
    /// The live session as reported by the auth service, possibly rotated.
    pub session: Option<SessionInfo>,
    /// Set when the decision was forced by a failed session query.
    pub fault: Option<GateFault>,
}

impl GateOutcome {
    fn pass_through() -> Self {
        Self {
            class: None,
            decision: Decision::Continue,
            session: None,
            fault: None,
        }
    }
}

/// Server-side interceptor deciding, per request, whether to continue or redirect.
///
/// Holds only immutable configuration and a shared provider handle, so one
/// instance serves concurrent requests. It never trusts client-side activity
/// state: every classified request re-validates against the auth service.
#[derive(Debug, Clone)]
pub struct AccessGate {
    routes: Arc<RouteTable>,
    redirects: Arc<Redirects>,
    provider: Arc<dyn AuthProvider>,
    query_timeout: Duration,
}

impl AccessGate {
    /// Creates a gate over explicit parts.
    pub fn new(
        routes: RouteTable,
        redirects: Redirects,
        provider: Arc<dyn AuthProvider>,
        query_timeout: Duration,
    ) -> Self {
        Self {
            routes: Arc::new(routes),
            redirects: Arc::new(redirects),
            provider,
            query_timeout,
        }
    }

    /// Creates a gate from application configuration.
    pub fn from_config(config: &AppConfig, provider: Arc<dyn AuthProvider>) -> Self {
        Self::new(
            RouteTable::from_config(&config.routes),
            Redirects::from_config(&config.routes),
            provider,
            config.auth_service.request_timeout(),
        )
    }

    /// Route tables in use.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Redirect targets in use.
    pub fn redirects(&self) -> &Redirects {
        &self.redirects
    }

    /// Decides what to do with a request for `path` carrying `token`.
    ///
    /// Excluded paths pass without contacting the auth service. A failed or
    /// timed-out session query always yields a sign-in redirect without a
    /// return path.
    pub async fn handle(&self, path: &str, token: Option<&SessionToken>) -> GateOutcome {
        let Some(class) = self.routes.resolve(path) else {
            return GateOutcome::pass_through();
        };

        match self.query_session(token).await {
            Ok(session) => {
                let decision = decide(class, session.is_some());
                debug!(
                    path,
                    class = %class,
                    session_present = session.is_some(),
                    decision = ?decision,
                    "Access gate decision"
                );
                GateOutcome {
                    class: Some(class),
                    decision,
                    session,
                    fault: None,
                }
            }
            Err(fault) => {
                warn!(
                    path,
                    class = %class,
                    upstream = fault.is_upstream(),
                    error = %fault,
                    "Failing closed"
                );
                GateOutcome {
                    class: Some(class),
                    decision: Decision::SIGN_IN,
                    session: None,
                    fault: Some(fault),
                }
            }
        }
    }

    /// Location header for an outcome, given the requested path and query.
    pub fn location(&self, outcome: &GateOutcome, requested: &str) -> Option<String> {
        self.redirects.location(outcome.decision, requested)
    }

    /// Asks the auth service whether `token` is a live session.
    ///
    /// No token means no session, without a network call.
    pub async fn query_session(
        &self,
        token: Option<&SessionToken>,
    ) -> Result<Option<SessionInfo>, GateFault> {
        let Some(token) = token else {
            return Ok(None);
        };

        let call = self.provider.validate_or_refresh_session(token);
        match tokio::time::timeout(self.query_timeout, call).await {
            Ok(Ok(session)) => Ok(session),
            Ok(Err(e)) => Err(GateFault::SessionQueryFailed(e)),
            Err(_) => Err(GateFault::SessionQueryFailed(AppError::timeout(format!(
                "auth service did not answer within {}ms",
                self.query_timeout.as_millis()
            )))),
        }
    }
}
