//! # classgate-core
//!
//! Core crate for ClassGate. Contains configuration schemas, the shared
//! collaborator traits (auth service, client persistence, clock, navigation),
//! session types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other ClassGate crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
