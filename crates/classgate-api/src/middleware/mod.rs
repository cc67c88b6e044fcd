//! Tower/axum middleware.

pub mod cors;
pub mod gate;
pub mod logging;
