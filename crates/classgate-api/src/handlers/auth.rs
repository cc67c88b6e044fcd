//! Session endpoints: status and sign-out.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use classgate_auth::GateFault;

use crate::cookies;
use crate::error::ApiError;
use crate::state::AppState;

/// Whether the caller holds a live session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// GET /api/auth/session
pub async fn session_status(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<SessionStatus>), ApiError> {
    let cookie_config = &state.config.session.cookie;
    let token = cookies::read_token(&jar, cookie_config);

    let session = state
        .gate
        .query_session(token.as_ref())
        .await
        .map_err(|GateFault::SessionQueryFailed(e)| ApiError(e))?;

    let jar = match (&token, &session) {
        (Some(presented), Some(s)) if s.rotated_from(presented) => {
            cookies::store_session(jar, s, cookie_config)
        }
        (Some(_), None) => cookies::clear_session(jar, cookie_config),
        _ => jar,
    };

    let status = SessionStatus {
        authenticated: session.is_some(),
        user_id: session.as_ref().map(|s| s.user_id.clone()),
        expires_at: session.as_ref().and_then(|s| s.expires_at),
    };
    Ok((jar, Json(status)))
}

/// POST /api/auth/sign-out
///
/// Invalidation is best effort; the cookies are cleared and the client is
/// sent to sign-in (303, no return path) either way.
pub async fn sign_out(State(state): State<AppState>, jar: CookieJar) -> Response {
    let cookie_config = &state.config.session.cookie;

    if let Some(token) = cookies::read_token(&jar, cookie_config) {
        match state.provider.invalidate_session(&token).await {
            Ok(()) => info!("Session signed out"),
            Err(e) => warn!(error = %e, "Session invalidation failed during sign-out"),
        }
    }

    let jar = cookies::clear_session(jar, cookie_config);
    let location = state.gate.redirects().sign_in();
    (jar, Redirect::to(&location)).into_response()
}
