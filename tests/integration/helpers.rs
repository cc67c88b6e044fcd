//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{HeaderMap, Request, StatusCode, header};
use tempfile::TempDir;
use tower::ServiceExt;

use classgate_api::AppState;
use classgate_core::config::AppConfig;
use classgate_core::error::AppError;
use classgate_core::result::AppResult;
use classgate_core::traits::auth_provider::AuthProvider;
use classgate_core::types::session::{SessionInfo, SessionToken};

pub const INDEX_HTML: &str = "<!doctype html><title>ClassGate</title>";
pub const APP_JS: &str = "console.log('classgate');";

/// In-process auth service keyed by access token.
#[derive(Debug, Default)]
pub struct StubAuthService {
    sessions: Mutex<HashMap<String, SessionInfo>>,
    failing: AtomicBool,
    pub validations: AtomicUsize,
    pub invalidations: AtomicUsize,
}

impl StubAuthService {
    /// Registers a live session for `access_token`, answered unchanged.
    pub fn live(&self, access_token: &str, user_id: &str) {
        self.answer(
            access_token,
            SessionInfo {
                user_id: user_id.to_string(),
                access_token: access_token.to_string(),
                refresh_token: Some(format!("{access_token}-refresh")),
                expires_at: None,
            },
        );
    }

    /// Answers `access_token` with `session`, e.g. a rotated pair.
    pub fn answer(&self, access_token: &str, session: SessionInfo) {
        self.sessions
            .lock()
            .unwrap()
            .insert(access_token.to_string(), session);
    }

    /// Makes every call fail as if the service were down.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn validation_count(&self) -> usize {
        self.validations.load(Ordering::SeqCst)
    }

    fn check_up(&self) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::external_service("auth service unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthProvider for StubAuthService {
    async fn validate_or_refresh_session(
        &self,
        token: &SessionToken,
    ) -> AppResult<Option<SessionInfo>> {
        self.validations.fetch_add(1, Ordering::SeqCst);
        self.check_up()?;
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .get(&token.access_token)
            .cloned())
    }

    async fn issue_extended_session(&self, token: &SessionToken) -> AppResult<SessionInfo> {
        self.check_up()?;
        Ok(SessionInfo {
            user_id: "learner-1".to_string(),
            access_token: format!("{}-extended", token.access_token),
            refresh_token: token.refresh_token.clone(),
            expires_at: None,
        })
    }

    async fn invalidate_session(&self, token: &SessionToken) -> AppResult<()> {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
        self.check_up()?;
        self.sessions.lock().unwrap().remove(&token.access_token);
        Ok(())
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// The auth service behind the app
    pub auth: Arc<StubAuthService>,
    /// Application config
    pub config: AppConfig,
    _web_root: TempDir,
}

impl TestApp {
    /// Create a new test application serving a small built front-end
    pub fn new() -> Self {
        let web_root = tempfile::tempdir().expect("Failed to create web root");
        std::fs::write(web_root.path().join("index.html"), INDEX_HTML)
            .expect("Failed to write index.html");
        std::fs::create_dir_all(web_root.path().join("assets")).expect("Failed to create assets");
        std::fs::write(web_root.path().join("assets/app.js"), APP_JS)
            .expect("Failed to write app.js");

        let mut config = AppConfig::default();
        config.server.web_root = web_root.path().to_string_lossy().into_owned();
        config.session.cookie.secure = false;
        config.validate().expect("Test config must be valid");

        let auth = Arc::new(StubAuthService::default());
        let state = AppState::new(config.clone(), auth.clone());
        let router = classgate_api::build_app(state);

        Self {
            router,
            auth,
            config,
            _web_root: web_root,
        }
    }

    /// Cookie header value carrying `access_token` and its refresh token
    pub fn session_cookie(&self, access_token: &str) -> String {
        let cookie = &self.config.session.cookie;
        format!(
            "{}={access_token}; {}={access_token}-refresh",
            cookie.access_token_name, cookie.refresh_token_name
        )
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, cookie: Option<&str>) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        let req = req.body(Body::empty()).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&body_bytes).into_owned(),
        }
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        self.request("GET", path, cookie).await
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw body
    pub body: String,
}

impl TestResponse {
    /// The `Location` header, if any.
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// Every `Set-Cookie` header.
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect()
    }

    /// The body parsed as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("Body is not JSON")
    }
}
