//! Collaborator traits implemented outside the core crate.

pub mod auth_provider;
pub mod kv_store;
pub mod navigator;

pub use auth_provider::AuthProvider;
pub use kv_store::KeyValueStore;
pub use navigator::Navigator;
