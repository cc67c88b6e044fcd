//! # classgate-auth
//!
//! Server-side half of ClassGate's session handling.
//!
//! ## Modules
//!
//! - `route`: path classification against the configured route tables
//! - `gate`: per-request access decisions (continue, or redirect to sign-in/dashboard)
//! - `provider`: HTTP client for the external auth service

pub mod gate;
pub mod provider;
pub mod route;

pub use gate::{AccessGate, Decision, GateFault, GateOutcome, RedirectTarget, Redirects};
pub use provider::HttpAuthProvider;
pub use route::{RouteClass, RouteTable};
