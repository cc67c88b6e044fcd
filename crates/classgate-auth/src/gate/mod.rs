//! Server-side access gate.

pub mod access;
pub mod decision;
pub mod redirect;

pub use access::{AccessGate, GateFault, GateOutcome};
pub use decision::{Decision, RedirectTarget, decide};
pub use redirect::{Redirects, sanitize_return_path};
