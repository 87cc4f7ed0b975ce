//! Extended attributes of a local filesystem.

use crate::error::{StorageError, StorageResult};
use crate::traits::{Attributes, XattrBackend};
use chunkdex_core::attrs::USER_NAMESPACE;
use std::io;
use std::path::Path;
use tracing::instrument;

/// Backend over the `user.` attribute namespace of the local filesystem.
///
/// Symlinks are not followed.
#[derive(Clone, Copy, Debug, Default)]
pub struct FilesystemXattrs;

impl FilesystemXattrs {
    pub fn new() -> Self {
        Self
    }

    fn os_name(key: &str) -> String {
        format!("{USER_NAMESPACE}{key}")
    }
}

#[cfg(target_os = "linux")]
fn is_absent_attribute(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::ENODATA)
}

#[cfg(not(target_os = "linux"))]
fn is_absent_attribute(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::ENOATTR)
}

impl XattrBackend for FilesystemXattrs {
    #[instrument(skip(self), fields(backend = "filesystem"))]
    fn read_all(&self, path: &Path) -> StorageResult<Attributes> {
        let names = xattr::list(path).map_err(|e| StorageError::from_io(path, e))?;

        let mut attrs = Attributes::new();
        for name in names {
            // Only user-namespace attributes belong to us; other namespaces
            // (security.*, trusted.*) are skipped, as are non-UTF-8 names.
            let Some(key) = name.to_str().and_then(|n| n.strip_prefix(USER_NAMESPACE)) else {
                continue;
            };
            match xattr::get(path, &name) {
                Ok(Some(value)) => {
                    attrs.insert(key.to_string(), value);
                }
                // Removed between list and get.
                Ok(None) => {}
                Err(e) if is_absent_attribute(&e) => {}
                Err(e) => return Err(StorageError::from_io(path, e)),
            }
        }
        Ok(attrs)
    }

    #[instrument(skip(self, value), fields(backend = "filesystem"))]
    fn set(&self, path: &Path, key: &str, value: &[u8]) -> StorageResult<()> {
        xattr::set(path, Self::os_name(key), value).map_err(|e| StorageError::from_io(path, e))
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    fn remove(&self, path: &Path, key: &str) -> StorageResult<()> {
        match xattr::remove(path, Self::os_name(key)) {
            Ok(()) => Ok(()),
            Err(e) if is_absent_attribute(&e) => Ok(()),
            Err(e) => Err(StorageError::from_io(path, e)),
        }
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}
