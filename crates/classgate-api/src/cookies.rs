//! Session cookies carrying the auth service's token pair.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use classgate_core::config::SessionCookieConfig;
use classgate_core::types::session::{SessionInfo, SessionToken};

/// Reads the token pair from the request cookies. An empty access token
/// counts as no session.
pub fn read_token(jar: &CookieJar, config: &SessionCookieConfig) -> Option<SessionToken> {
    let access = jar
        .get(&config.access_token_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())?;
    let refresh = jar
        .get(&config.refresh_token_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty());
    Some(SessionToken::new(access, refresh))
}

/// Re-issues cookies for a (possibly rotated) session.
pub fn store_session(jar: CookieJar, session: &SessionInfo, config: &SessionCookieConfig) -> CookieJar {
    let jar = jar.add(session_cookie(
        &config.access_token_name,
        &session.access_token,
        config,
    ));
    match &session.refresh_token {
        Some(refresh) => jar.add(session_cookie(&config.refresh_token_name, refresh, config)),
        None => jar,
    }
}

/// Removes both session cookies.
pub fn clear_session(jar: CookieJar, config: &SessionCookieConfig) -> CookieJar {
    jar.remove(removal_cookie(&config.access_token_name))
        .remove(removal_cookie(&config.refresh_token_name))
}

fn session_cookie(name: &str, value: &str, config: &SessionCookieConfig) -> Cookie<'static> {
    Cookie::build((name.to_string(), value.to_string()))
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(Duration::days(config.max_age_days))
        .build()
}

fn removal_cookie(name: &str) -> Cookie<'static> {
    Cookie::build((name.to_string(), "")).path("/".to_string()).build()
}
