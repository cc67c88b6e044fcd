//! JSON-file store implementation.
//!
//! The whole store is one JSON object. Every read goes to disk so that a
//! second process sharing the file sees the latest value; writes replace the
//! file atomically through a sibling temp file.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use classgate_core::error::{AppError, ErrorKind};
use classgate_core::result::AppResult;
use classgate_core::traits::kv_store::KeyValueStore;

type Document = BTreeMap<String, String>;

/// Key-value store persisted as a JSON document.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Arc<Mutex<()>>,
}

impl FileStore {
    /// Opens (or lazily creates) a store at `path`.
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create store directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        Ok(Self {
            path,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> AppResult<Document> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(Document::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(Document::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_document(&self, doc: &Document) -> AppResult<()> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(doc)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn modify(&self, f: impl FnOnce(&mut Document)) -> AppResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut doc = self.read_document()?;
        f(&mut doc);
        self.write_document(&doc)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.read_document()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.modify(|doc| {
            doc.insert(key.to_string(), value.to_string());
        })?;
        debug!(key, path = %self.path.display(), "Persisted store key");
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.modify(|doc| {
            doc.remove(key);
        })
    }
}
