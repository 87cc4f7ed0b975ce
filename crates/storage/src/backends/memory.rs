//! In-process attribute backend.
//!
//! Attributes live in a map keyed by file path; the files themselves are
//! untouched. Used for dry runs against a copy of a volume tree and in tests.

use crate::error::{StorageError, StorageResult};
use crate::traits::{Attributes, XattrBackend};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct MemoryXattrs {
    files: Mutex<HashMap<PathBuf, Attributes>>,
}

impl MemoryXattrs {
    pub fn new() -> Self {
        Self::default()
    }

    fn files(&self) -> MutexGuard<'_, HashMap<PathBuf, Attributes>> {
        // A panic while holding the lock cannot leave a half-written map entry.
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace every attribute of `path`.
    pub fn insert_all(&self, path: impl Into<PathBuf>, attrs: Attributes) {
        self.files().insert(path.into(), attrs);
    }

    /// Current attributes of `path`, if it has any.
    pub fn snapshot(&self, path: &Path) -> Option<Attributes> {
        self.files().get(path).cloned()
    }
}

impl XattrBackend for MemoryXattrs {
    fn read_all(&self, path: &Path) -> StorageResult<Attributes> {
        if let Some(attrs) = self.files().get(path) {
            return Ok(attrs.clone());
        }
        if path.exists() {
            Ok(Attributes::new())
        } else {
            Err(StorageError::NotFound(path.to_path_buf()))
        }
    }

    fn set(&self, path: &Path, key: &str, value: &[u8]) -> StorageResult<()> {
        self.files()
            .entry(path.to_path_buf())
            .or_default()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, path: &Path, key: &str) -> StorageResult<()> {
        if let Some(attrs) = self.files().get_mut(path) {
            attrs.remove(key);
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
