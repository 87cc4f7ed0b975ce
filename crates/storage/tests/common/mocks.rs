use chunkdex_storage::error::{StorageError, StorageResult};
use chunkdex_storage::{Attributes, MemoryXattrs, XattrBackend};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One mutating call seen by [`InstrumentedBackend`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendOp {
    Set(String),
    Remove(String),
}

/// Memory backend that records mutating calls and can fail them.
#[allow(dead_code)]
#[derive(Default)]
pub struct InstrumentedBackend {
    pub inner: MemoryXattrs,
    ops: Mutex<Vec<BackendOp>>,
    /// Mutating calls left before every following one fails, if set.
    fail_after: Mutex<Option<usize>>,
    /// Fail every removal with an I/O error.
    pub fail_removals: bool,
    /// Fail every read as if the filesystem had no xattr support.
    pub unsupported: bool,
}

#[allow(dead_code)]
impl InstrumentedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failing_removals() -> Self {
        Self {
            fail_removals: true,
            ..Self::default()
        }
    }

    pub fn unsupported() -> Self {
        Self {
            unsupported: true,
            ..Self::default()
        }
    }

    /// Let `n` mutating calls through, then fail the rest. Simulates a crash.
    pub fn fail_after(&self, n: usize) {
        *self.fail_after.lock().unwrap() = Some(n);
    }

    /// Stop injecting failures.
    pub fn heal(&self) {
        *self.fail_after.lock().unwrap() = None;
    }

    pub fn ops(&self) -> Vec<BackendOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn clear_ops(&self) {
        self.ops.lock().unwrap().clear();
    }

    pub fn attributes(&self, path: &Path) -> Attributes {
        self.inner.snapshot(path).unwrap_or_default()
    }

    fn admit(&self, path: &Path) -> StorageResult<()> {
        let mut budget = self.fail_after.lock().unwrap();
        match budget.as_mut() {
            Some(0) => Err(StorageError::Io(std::io::Error::other(format!(
                "injected failure on {}",
                path.display()
            )))),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl XattrBackend for InstrumentedBackend {
    fn read_all(&self, path: &Path) -> StorageResult<Attributes> {
        if self.unsupported {
            return Err(StorageError::Unsupported(PathBuf::from(path)));
        }
        self.inner.read_all(path)
    }

    fn set(&self, path: &Path, key: &str, value: &[u8]) -> StorageResult<()> {
        self.admit(path)?;
        self.ops.lock().unwrap().push(BackendOp::Set(key.to_string()));
        self.inner.set(path, key, value)
    }

    fn remove(&self, path: &Path, key: &str) -> StorageResult<()> {
        self.admit(path)?;
        self.ops
            .lock()
            .unwrap()
            .push(BackendOp::Remove(key.to_string()));
        if self.fail_removals {
            return Err(StorageError::Io(std::io::Error::other("removal refused")));
        }
        self.inner.remove(path, key)
    }

    fn backend_name(&self) -> &'static str {
        "instrumented"
    }
}
