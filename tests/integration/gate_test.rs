//! Integration tests for the access gate and the session endpoints.

mod helpers;

use http::StatusCode;

use classgate_core::types::session::SessionInfo;

use helpers::{APP_JS, INDEX_HTML, TestApp};

#[tokio::test]
async fn test_protected_without_session_redirects_with_return_path() {
    let app = TestApp::new();

    let response = app.get("/courses/42?tab=notes", None).await;

    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.location(),
        Some("/sign-in?redirectTo=%2Fcourses%2F42%3Ftab%3Dnotes")
    );
    assert_eq!(app.auth.validation_count(), 0);
}

#[tokio::test]
async fn test_onboarding_without_session_redirects_to_sign_in() {
    let app = TestApp::new();

    let response = app.get("/onboarding/step-2", None).await;

    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.location(),
        Some("/sign-in?redirectTo=%2Fonboarding%2Fstep-2")
    );
}

#[tokio::test]
async fn test_protected_with_session_serves_page() {
    let app = TestApp::new();
    app.auth.live("a1", "learner-1");
    let cookie = app.session_cookie("a1");

    let response = app.get("/dashboard", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, INDEX_HTML);
    assert!(response.set_cookies().is_empty());
    assert_eq!(app.auth.validation_count(), 1);
}

#[tokio::test]
async fn test_public_with_session_goes_to_dashboard() {
    let app = TestApp::new();
    app.auth.live("a1", "learner-1");
    let cookie = app.session_cookie("a1");

    for path in ["/", "/sign-in", "/sign-in?redirectTo=%2Fcourses", "/about/"] {
        let response = app.get(path, Some(&cookie)).await;
        assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT, "{path}");
        assert_eq!(response.location(), Some("/dashboard"), "{path}");
    }
}

#[tokio::test]
async fn test_public_without_session_is_served() {
    let app = TestApp::new();

    let response = app.get("/sign-in", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, INDEX_HTML);
}

#[tokio::test]
async fn test_auth_callback_always_continues() {
    let app = TestApp::new();
    app.auth.live("a1", "learner-1");
    let cookie = app.session_cookie("a1");

    let signed_out = app.get("/auth/callback?code=abc", None).await;
    let signed_in = app.get("/auth/callback?code=abc", Some(&cookie)).await;

    assert_eq!(signed_out.status, StatusCode::OK);
    assert_eq!(signed_in.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unclassified_page_continues() {
    let app = TestApp::new();

    let response = app.get("/pricing", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, INDEX_HTML);
}

#[tokio::test]
async fn test_excluded_asset_skips_auth_service() {
    let app = TestApp::new();
    app.auth.fail();
    let cookie = app.session_cookie("a1");

    let response = app.get("/assets/app.js", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, APP_JS);
    assert_eq!(app.auth.validation_count(), 0);
}

#[tokio::test]
async fn test_auth_service_failure_fails_closed() {
    let app = TestApp::new();
    app.auth.live("a1", "learner-1");
    app.auth.fail();
    let cookie = app.session_cookie("a1");

    for path in ["/dashboard", "/onboarding", "/courses/7?x=1", "/pricing"] {
        let response = app.get(path, Some(&cookie)).await;
        assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT, "{path}");
        assert_eq!(response.location(), Some("/sign-in"), "{path}");
        assert!(response.set_cookies().is_empty(), "{path}");
    }
}

#[tokio::test]
async fn test_auth_service_failure_on_sign_in_breaks_redirect_loop() {
    let app = TestApp::new();
    app.auth.fail();
    let cookie = app.session_cookie("a1");

    for path in ["/sign-in", "/sign-in?redirectTo=%2Fcourses"] {
        let response = app.get(path, Some(&cookie)).await;
        assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT, "{path}");
        assert_eq!(response.location(), Some("/sign-in"), "{path}");
        let set_cookies = response.set_cookies();
        assert_eq!(set_cookies.len(), 2, "{path}");
        assert!(set_cookies.iter().any(|c| c.starts_with("cg_access_token=;")));
        assert!(set_cookies.iter().any(|c| c.starts_with("cg_refresh_token=;")));
    }

    // Once the cookies are gone the sign-in page renders.
    let after = app.get("/sign-in", None).await;
    assert_eq!(after.status, StatusCode::OK);
    assert_eq!(after.body, INDEX_HTML);
}

#[tokio::test]
async fn test_rotated_tokens_are_reissued() {
    let app = TestApp::new();
    app.auth.answer(
        "a1",
        SessionInfo {
            user_id: "learner-1".to_string(),
            access_token: "a2".to_string(),
            refresh_token: Some("r2".to_string()),
            expires_at: None,
        },
    );
    let cookie = app.session_cookie("a1");

    let response = app.get("/courses", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::OK);
    let set_cookies = response.set_cookies();
    assert_eq!(set_cookies.len(), 2);
    let access = set_cookies
        .iter()
        .find(|c| c.starts_with("cg_access_token=a2"))
        .expect("access cookie re-issued");
    assert!(access.contains("HttpOnly"));
    assert!(access.contains("SameSite=Lax"));
    assert!(access.contains("Path=/"));
    assert!(
        set_cookies
            .iter()
            .any(|c| c.starts_with("cg_refresh_token=r2"))
    );
}

#[tokio::test]
async fn test_unknown_session_clears_cookies() {
    let app = TestApp::new();
    let cookie = app.session_cookie("stale");

    let response = app.get("/progress", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location(), Some("/sign-in?redirectTo=%2Fprogress"));
    let set_cookies = response.set_cookies();
    assert_eq!(set_cookies.len(), 2);
    assert!(set_cookies.iter().any(|c| c.starts_with("cg_access_token=;")));
    assert!(set_cookies.iter().any(|c| c.starts_with("cg_refresh_token=;")));
}

#[tokio::test]
async fn test_health_bypasses_gate() {
    let app = TestApp::new();
    let cookie = app.session_cookie("a1");

    let response = app.get("/api/health", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "ok");
    assert_eq!(app.auth.validation_count(), 0);
}

#[tokio::test]
async fn test_session_status() {
    let app = TestApp::new();
    app.auth.live("a1", "learner-1");
    let cookie = app.session_cookie("a1");

    let signed_in = app.get("/api/auth/session", Some(&cookie)).await;
    assert_eq!(signed_in.status, StatusCode::OK);
    let body = signed_in.json();
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["user_id"], "learner-1");

    let signed_out = app.get("/api/auth/session", None).await;
    assert_eq!(signed_out.status, StatusCode::OK);
    let body = signed_out.json();
    assert_eq!(body["authenticated"], false);
    assert!(body.get("user_id").is_none());
}

#[tokio::test]
async fn test_session_status_reports_auth_service_failure() {
    let app = TestApp::new();
    app.auth.fail();
    let cookie = app.session_cookie("a1");

    let response = app.get("/api/auth/session", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert!(response.set_cookies().is_empty());
}

#[tokio::test]
async fn test_sign_out_clears_cookies_and_invalidates() {
    let app = TestApp::new();
    app.auth.live("a1", "learner-1");
    let cookie = app.session_cookie("a1");

    let response = app.request("POST", "/api/auth/sign-out", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/sign-in"));
    assert_eq!(response.set_cookies().len(), 2);
    assert_eq!(
        app.auth
            .invalidations
            .load(std::sync::atomic::Ordering::SeqCst),
        1
    );

    let after = app.get("/dashboard", Some(&cookie)).await;
    assert_eq!(after.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(after.location(), Some("/sign-in?redirectTo=%2Fdashboard"));
}

#[tokio::test]
async fn test_sign_out_survives_auth_service_failure() {
    let app = TestApp::new();
    app.auth.fail();
    let cookie = app.session_cookie("a1");

    let response = app.request("POST", "/api/auth/sign-out", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/sign-in"));
    assert_eq!(response.set_cookies().len(), 2);
}
