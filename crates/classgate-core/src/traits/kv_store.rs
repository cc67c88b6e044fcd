//! Client persistence trait.

use crate::result::AppResult;

/// Durable, synchronous string key-value store scoped to one client context.
///
/// Mirrors browser local storage: it survives reloads and is shared by every
/// tab of the same context, so values may change between two reads made by
/// the same tab.
pub trait KeyValueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key.
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> AppResult<()>;
}
