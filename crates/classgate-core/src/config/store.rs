//! Client persistence configuration.

use serde::{Deserialize, Serialize};

/// Selects the key-value backend that holds `lastActivityAt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Provider: `"memory"` or `"file"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// File backend settings.
    #[serde(default)]
    pub file: FileStoreConfig,
}

/// File-backed store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileStoreConfig {
    /// Path of the JSON document holding all keys.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            file: FileStoreConfig::default(),
        }
    }
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_path() -> String {
    "data/client-store.json".to_string()
}
