//! # classgate-store
//!
//! Client persistence backends for ClassGate. Supports two modes:
//!
//! - **memory**: process-local map using [dashmap](https://crates.io/crates/dashmap);
//!   clones share one map, the way tabs share one browser context
//! - **file**: a JSON document on disk that survives restarts
//!
//! The backend is selected at runtime based on configuration.

#[cfg(feature = "file")]
pub mod file;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;

pub use provider::StoreManager;
