//! [`AuthProvider`] over the auth service's HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, warn};

use classgate_core::config::AuthServiceConfig;
use classgate_core::error::{AppError, ErrorKind};
use classgate_core::result::AppResult;
use classgate_core::traits::auth_provider::AuthProvider;
use classgate_core::types::session::{SessionInfo, SessionToken};

const API_KEY_HEADER: &str = "apikey";

#[derive(Serialize)]
struct RefreshBody<'a> {
    refresh_token: Option<&'a str>,
}

/// HTTP client for the external auth service.
///
/// Every call carries the access token as a bearer credential and the
/// refresh token in a JSON body. Calls are bounded by the configured request
/// timeout and are never retried.
#[derive(Debug, Clone)]
pub struct HttpAuthProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpAuthProvider {
    /// Builds a client from configuration.
    pub fn new(config: &AuthServiceConfig) -> AppResult<Self> {
        let timeout = config.request_timeout();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build auth service HTTP client",
                    e,
                )
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout,
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/session/{action}", self.base_url)
    }

    async fn post(&self, action: &str, token: &SessionToken) -> AppResult<reqwest::Response> {
        let mut request = self
            .http
            .post(self.endpoint(action))
            .bearer_auth(&token.access_token)
            .json(&RefreshBody {
                refresh_token: token.refresh_token.as_deref(),
            });
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        request.send().await.map_err(|e| self.transport_error(action, e))
    }

    fn transport_error(&self, action: &str, e: reqwest::Error) -> AppError {
        if e.is_timeout() {
            AppError::with_source(
                ErrorKind::Timeout,
                format!(
                    "Auth service '{action}' timed out after {}ms",
                    self.timeout.as_millis()
                ),
                e,
            )
        } else {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Auth service '{action}' request failed"),
                e,
            )
        }
    }

    async fn ensure_success(
        &self,
        action: &str,
        response: reqwest::Response,
    ) -> AppResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(action, status = status.as_u16(), "Auth service rejected request");
        let kind = if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            ErrorKind::Authentication
        } else {
            ErrorKind::ExternalService
        };
        Err(AppError::new(
            kind,
            format!("Auth service '{action}' returned {status}: {body}"),
        ))
    }

    async fn read_session(&self, action: &str, response: reqwest::Response) -> AppResult<SessionInfo> {
        response
            .json::<SessionInfo>()
            .await
            .map_err(|e| self.transport_error(action, e))
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn validate_or_refresh_session(
        &self,
        token: &SessionToken,
    ) -> AppResult<Option<SessionInfo>> {
        let response = self.post("validate", token).await?;
        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND
        ) {
            debug!("Auth service reports no live session");
            return Ok(None);
        }

        let response = self.ensure_success("validate", response).await?;
        let session = self.read_session("validate", response).await?;
        debug!(user_id = %session.user_id, rotated = session.rotated_from(token), "Session validated");
        Ok(Some(session))
    }

    async fn issue_extended_session(&self, token: &SessionToken) -> AppResult<SessionInfo> {
        let response = self.post("extend", token).await?;
        let response = self.ensure_success("extend", response).await?;
        let session = self.read_session("extend", response).await?;
        debug!(user_id = %session.user_id, "Session extended");
        Ok(session)
    }

    async fn invalidate_session(&self, token: &SessionToken) -> AppResult<()> {
        let response = self.post("invalidate", token).await?;
        // Already gone counts as invalidated.
        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND
        ) {
            return Ok(());
        }
        self.ensure_success("invalidate", response).await?;
        debug!("Session invalidated");
        Ok(())
    }
}
