//! Store manager that dispatches to the configured backend.

use std::sync::Arc;

use tracing::info;

use classgate_core::config::StoreConfig;
use classgate_core::error::AppError;
use classgate_core::result::AppResult;
use classgate_core::traits::kv_store::KeyValueStore;

/// Store manager that wraps the configured backend.
#[derive(Debug, Clone)]
pub struct StoreManager {
    inner: Arc<dyn KeyValueStore>,
}

impl StoreManager {
    /// Create a new store manager from configuration.
    pub fn new(config: &StoreConfig) -> AppResult<Self> {
        let inner: Arc<dyn KeyValueStore> = match config.provider.as_str() {
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory client store");
                Arc::new(crate::memory::MemoryStore::new())
            }
            #[cfg(feature = "file")]
            "file" => {
                info!(path = %config.file.path, "Initializing file-backed client store");
                Arc::new(crate::file::FileStore::open(&config.file.path)?)
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: memory, file"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a store manager from an existing backend (for testing).
    pub fn from_store(store: Arc<dyn KeyValueStore>) -> Self {
        Self { inner: store }
    }

    /// Shared handle to the backend.
    pub fn shared(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.inner)
    }
}

impl KeyValueStore for StoreManager {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.inner.remove(key)
    }
}
