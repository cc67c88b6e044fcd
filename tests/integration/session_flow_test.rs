//! End-to-end tests for the client session lifecycle.

mod helpers;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use chrono::DateTime;
use http::StatusCode;
use tokio::time::{self, Instant};

use classgate_client::{
    ActivitySignal, HistoryNavigator, RuntimeClock, SessionStore, SessionSupervisor,
    SignOutReason, WatchdogState,
};
use classgate_core::config::AppConfig;
use classgate_core::types::session::SessionToken;
use classgate_store::memory::MemoryStore;

use helpers::{StubAuthService, TestApp};

const MINUTE: Duration = Duration::from_secs(60);

struct Client {
    kv: MemoryStore,
    store: Arc<SessionStore>,
    navigator: HistoryNavigator,
    config: AppConfig,
}

impl Client {
    fn signed_in(access_token: &str) -> Self {
        let config = AppConfig::default();
        let kv = MemoryStore::new();
        let clock = RuntimeClock::anchored_at(DateTime::from_timestamp(1_700_000_000, 0).unwrap());
        let store = Arc::new(SessionStore::from_config(
            Arc::new(kv.clone()),
            Arc::new(clock),
            &config.session,
        ));
        store
            .begin(SessionToken::new(
                access_token,
                Some(format!("{access_token}-refresh")),
            ))
            .unwrap();
        Self {
            kv,
            store,
            navigator: HistoryNavigator::new(),
            config,
        }
    }

    /// A second tab of the same client context.
    fn other_tab(&self) -> SessionStore {
        let tab = SessionStore::from_config(
            Arc::new(self.kv.clone()),
            Arc::new(RuntimeClock::anchored_at(self.store.now())),
            &self.config.session,
        );
        if let Some(token) = self.store.token() {
            tab.replace_token(token);
        }
        tab
    }

    fn supervise(&self, auth: Arc<StubAuthService>) -> classgate_client::SupervisorHandle {
        SessionSupervisor::new(
            self.store.clone(),
            auth,
            Arc::new(self.navigator.clone()),
            &self.config,
        )
        .spawn()
    }
}

#[tokio::test(start_paused = true)]
async fn test_warning_extension_then_expiry() {
    let auth = Arc::new(StubAuthService::default());
    let client = Client::signed_in("a1");
    let handle = client.supervise(auth.clone());
    let mut states = handle.subscribe();
    let started = Instant::now();

    // Warning appears five minutes before the timeout.
    let warning = *states
        .wait_for(|s| matches!(s, WatchdogState::Warning { .. }))
        .await
        .unwrap();
    assert!(matches!(
        warning,
        WatchdogState::Warning { seconds_remaining: 299..=300 }
    ));
    let warned_after = started.elapsed();
    assert!(warned_after >= 25 * MINUTE && warned_after < 25 * MINUTE + Duration::from_secs(2));

    // Staying signed in swaps the token and restarts the countdown.
    let extended = handle.stay_signed_in().await.unwrap();
    assert_eq!(extended.session.access_token, "a1-extended");
    assert_eq!(handle.state(), WatchdogState::Active);
    assert_eq!(client.store.token().unwrap().access_token, "a1-extended");
    let extended_at = Instant::now();

    // No further activity: the session ends a full timeout after extension.
    let reason = handle.finished().await;
    assert_eq!(reason, Some(SignOutReason::Expired));
    let idle = extended_at.elapsed();
    assert!(idle >= 30 * MINUTE && idle < 30 * MINUTE + Duration::from_secs(2));

    assert_eq!(client.navigator.history(), vec!["/sign-in".to_string()]);
    assert_eq!(auth.invalidations.load(Ordering::SeqCst), 1);
    assert!(!client.store.is_present());
    assert_eq!(client.store.last_activity().unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn test_activity_in_any_tab_keeps_session_alive() {
    let auth = Arc::new(StubAuthService::default());
    let client = Client::signed_in("a1");
    let handle = client.supervise(auth.clone());
    let other_tab = client.other_tab();

    for round in 0..6 {
        time::sleep(20 * MINUTE).await;
        if round % 2 == 0 {
            handle.activity(ActivitySignal::PointerMove);
        } else {
            other_tab.touch().unwrap();
        }
    }

    assert_eq!(handle.state(), WatchdogState::Active);
    assert!(client.navigator.history().is_empty());
    assert_eq!(auth.invalidations.load(Ordering::SeqCst), 0);
    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_sign_out_in_another_tab_ends_this_one() {
    let auth = Arc::new(StubAuthService::default());
    let client = Client::signed_in("a1");
    let handle = client.supervise(auth);

    time::sleep(MINUTE).await;
    client.other_tab().clear_activity().unwrap();

    assert_eq!(handle.finished().await, Some(SignOutReason::Expired));
    assert_eq!(client.navigator.last().as_deref(), Some("/sign-in"));
}

#[tokio::test]
async fn test_client_sign_out_revokes_server_access() {
    let app = TestApp::new();
    app.auth.live("a1", "learner-1");
    let cookie = app.session_cookie("a1");

    let before = app.get("/lessons/3", Some(&cookie)).await;
    assert_eq!(before.status, StatusCode::OK);

    let client = Client::signed_in("a1");
    let handle = client.supervise(app.auth.clone());
    handle.sign_out().await;
    assert_eq!(client.navigator.history(), vec!["/sign-in".to_string()]);

    let after = app.get("/lessons/3", Some(&cookie)).await;
    assert_eq!(after.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(after.location(), Some("/sign-in?redirectTo=%2Flessons%2F3"));
    assert_eq!(handle.finished().await, Some(SignOutReason::UserRequested));
}
