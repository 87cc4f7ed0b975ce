//! Volume identification and health.

use crate::error::{StorageError, StorageResult};
use crate::traits::{Attributes, XattrBackend};
use chunkdex_core::VolumeReference;
use chunkdex_core::attrs::{VOLUME_ID, VOLUME_NAMESPACE, VOLUME_TYPE, VOLUME_TYPE_RAWX};
use std::path::Path;

/// Identify the volume rooted at `root`.
///
/// Id and namespace come from the root's attributes; explicit overrides win.
/// When both overrides are given the root attributes are optional: a
/// filesystem that cannot read them only produces a warning, and the volume
/// type is checked only if it is recorded.
pub fn probe_volume(
    root: &Path,
    backend: &dyn XattrBackend,
    volume_id: Option<&str>,
    namespace: Option<&str>,
) -> StorageResult<VolumeReference> {
    check_root(root)?;
    let fully_overridden = volume_id.is_some() && namespace.is_some();

    let attrs = match backend.read_all(root) {
        Ok(attrs) => attrs,
        Err(e) if fully_overridden => {
            tracing::warn!(
                root = %root.display(),
                error = %e,
                "Cannot read volume attributes, using configured identity"
            );
            Attributes::new()
        }
        Err(e) => return Err(e),
    };

    match value(&attrs, VOLUME_TYPE) {
        Some(kind) if kind == VOLUME_TYPE_RAWX => {}
        None if fully_overridden => {}
        Some(kind) => {
            return Err(StorageError::VolumeNotInitialized(format!(
                "{} is a {kind} volume, expected {VOLUME_TYPE_RAWX}",
                root.display()
            )));
        }
        None => {
            return Err(StorageError::VolumeNotInitialized(format!(
                "{} has no {VOLUME_TYPE} attribute",
                root.display()
            )));
        }
    }

    let volume_id = volume_id
        .map(str::to_string)
        .or_else(|| value(&attrs, VOLUME_ID))
        .ok_or_else(|| {
            StorageError::VolumeNotInitialized(format!(
                "{} has no {VOLUME_ID} attribute and no volume id is configured",
                root.display()
            ))
        })?;
    let namespace = namespace
        .map(str::to_string)
        .or_else(|| value(&attrs, VOLUME_NAMESPACE))
        .ok_or_else(|| {
            StorageError::VolumeNotInitialized(format!(
                "{} has no {VOLUME_NAMESPACE} attribute and no namespace is configured",
                root.display()
            ))
        })?;

    Ok(VolumeReference::new(root, volume_id, namespace))
}

/// Verify the volume root is still a readable directory.
pub fn check_root(root: &Path) -> StorageResult<()> {
    let unavailable = |reason: String| StorageError::VolumeUnavailable {
        path: root.to_path_buf(),
        reason,
    };

    let meta = std::fs::metadata(root).map_err(|e| unavailable(e.to_string()))?;
    if !meta.is_dir() {
        return Err(unavailable("not a directory".to_string()));
    }
    std::fs::read_dir(root).map_err(|e| unavailable(e.to_string()))?;
    Ok(())
}

fn value(attrs: &Attributes, key: &str) -> Option<String> {
    attrs
        .get(key)
        .and_then(|raw| std::str::from_utf8(raw).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
