//! # classgate-api
//!
//! HTTP layer for ClassGate built on Axum.
//!
//! Every page request passes through the access gate middleware, which reads
//! the session cookies, asks the auth service whether the session is live,
//! and either serves the page or redirects. Also provides the sign-out and
//! session-status endpoints, request logging, CORS, and error mapping.

pub mod app;
pub mod cookies;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
