//! Route definitions for the ClassGate HTTP surface.
//!
//! API routes live under `/api`. Everything else is a page served from the
//! configured web root, behind the access gate.

use std::path::Path;

use axum::Router;
use axum::middleware as axum_middleware;
use axum::routing::{get, post};
use tower_http::services::{ServeDir, ServeFile};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the router with all routes and the gate applied to pages.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .merge(page_routes(&state))
        .with_state(state)
}

/// Session endpoints
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/session", get(handlers::auth::session_status))
        .route("/auth/sign-out", post(handlers::auth::sign_out))
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Static pages behind the gate. Unknown paths fall back to `index.html`
/// so client-side routes resolve.
fn page_routes(state: &AppState) -> Router<AppState> {
    let root = Path::new(&state.config.server.web_root);
    let pages = ServeDir::new(root)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(root.join("index.html")));

    Router::new()
        .fallback_service(pages)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::gate::access_gate,
        ))
}
