//! Access gate middleware for page routes.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::cookies;
use crate::state::AppState;

/// Runs the access gate on every request.
///
/// Redirects are temporary (307). Rotated tokens are re-issued as cookies;
/// cookies for a session the auth service no longer knows are cleared. A
/// failed session query leaves the cookies alone, unless the redirect would
/// point back at the requested page: then they are cleared so the sign-in
/// page can render instead of redirecting to itself.
pub async fn access_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let requested = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    let cookie_config = &state.config.session.cookie;
    let token = cookies::read_token(&jar, cookie_config);
    let outcome = state.gate.handle(&requested, token.as_ref()).await;

    let jar = match (&token, &outcome.session) {
        (Some(presented), Some(session)) if session.rotated_from(presented) => {
            debug!(user_id = %session.user_id, "Re-issuing rotated session cookies");
            cookies::store_session(jar, session, cookie_config)
        }
        (Some(_), None) if outcome.class.is_some() && outcome.fault.is_none() => {
            cookies::clear_session(jar, cookie_config)
        }
        _ => jar,
    };

    match state.gate.location(&outcome, &requested) {
        Some(location) => {
            let loops_back = outcome.fault.is_some() && same_page(&location, &requested);
            let jar = if loops_back && token.is_some() {
                debug!(location = %location, "Clearing cookies to break a sign-in redirect loop");
                cookies::clear_session(jar, cookie_config)
            } else {
                jar
            };
            (jar, Redirect::temporary(&location)).into_response()
        }
        None => (jar, next.run(request).await).into_response(),
    }
}

fn same_page(location: &str, requested: &str) -> bool {
    path_only(location) == path_only(requested)
}

fn path_only(target: &str) -> &str {
    target.split(['?', '#']).next().unwrap_or(target)
}
