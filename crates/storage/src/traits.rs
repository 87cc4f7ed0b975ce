//! Storage trait definitions.

use crate::error::StorageResult;
use std::collections::BTreeMap;
use std::path::Path;

/// All extended attributes of one file, keyed by logical name.
pub type Attributes = BTreeMap<String, Vec<u8>>;

/// Extended-attribute capability of a volume.
///
/// Keys are logical names without a namespace prefix; backends map them to
/// whatever their filesystem requires. Each call is an independent operation:
/// nothing is atomic across keys.
pub trait XattrBackend: Send + Sync {
    /// Read every attribute of `path`.
    fn read_all(&self, path: &Path) -> StorageResult<Attributes>;

    /// Create or replace one attribute.
    fn set(&self, path: &Path, key: &str, value: &[u8]) -> StorageResult<()>;

    /// Remove one attribute. Removing an absent key succeeds.
    fn remove(&self, path: &Path, key: &str) -> StorageResult<()>;

    /// Backend name for logging.
    fn backend_name(&self) -> &'static str;
}
