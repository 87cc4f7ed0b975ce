//! Chunk descriptors read from and written to extended attributes.

use crate::error::{StorageError, StorageResult};
use crate::traits::{Attributes, XattrBackend};
use chunkdex_core::attrs::{self as keys, Fullpath, fullpath_key};
use chunkdex_core::{ChunkDescriptor, ChunkId};
use std::path::Path;
use std::sync::Arc;

/// Typed access to the attributes of chunk files.
#[derive(Clone)]
pub struct AttributeStore {
    backend: Arc<dyn XattrBackend>,
}

impl AttributeStore {
    pub fn new(backend: Arc<dyn XattrBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    pub fn read_attributes(&self, path: &Path) -> StorageResult<Attributes> {
        self.backend.read_all(path)
    }

    /// Read the current descriptor of a chunk file.
    ///
    /// Fails with [`StorageError::MissingAttribute`] when a required key is
    /// absent, and with [`StorageError::Unsupported`] when the filesystem has
    /// no extended attributes at all.
    pub fn read_descriptor(
        &self,
        path: &Path,
        chunk_id: &ChunkId,
    ) -> StorageResult<ChunkDescriptor> {
        let attrs = self.backend.read_all(path)?;
        descriptor_from_attributes(&attrs, chunk_id)
    }

    /// Set `additions` then remove `removals`, one independent call per key.
    ///
    /// Removing an absent key is not an error. A failure stops the sequence;
    /// keys already written stay written.
    pub fn write_keys(
        &self,
        path: &Path,
        additions: &[(&str, &[u8])],
        removals: &[&str],
    ) -> StorageResult<()> {
        for (key, value) in additions {
            self.backend.set(path, key, value)?;
        }
        for key in removals {
            self.backend.remove(path, key)?;
        }
        Ok(())
    }

    /// Remove `key`, logging instead of failing. Leftover keys are retried by
    /// the next conversion.
    pub fn remove_quietly(&self, path: &Path, key: &str) {
        if let Err(e) = self.backend.remove(path, key) {
            tracing::debug!(
                path = %path.display(),
                key = key,
                error = %e,
                "Failed to remove attribute, ignoring"
            );
        }
    }
}

fn text<'a>(attrs: &'a Attributes, key: &str) -> StorageResult<Option<&'a str>> {
    attrs
        .get(key)
        .map(|raw| {
            std::str::from_utf8(raw).map_err(|e| StorageError::InvalidAttribute {
                key: key.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

fn required<'a>(attrs: &'a Attributes, key: &str) -> StorageResult<&'a str> {
    text(attrs, key)?.ok_or_else(|| StorageError::MissingAttribute(key.to_string()))
}

fn parse<T>(attrs: &Attributes, key: &str) -> StorageResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    required(attrs, key)?
        .trim()
        .parse()
        .map_err(|e: T::Err| StorageError::InvalidAttribute {
            key: key.to_string(),
            reason: e.to_string(),
        })
}

/// Legacy per-field address of a chunk, as written before the consolidated key.
pub(crate) fn legacy_fullpath(attrs: &Attributes) -> StorageResult<Fullpath> {
    Ok(Fullpath {
        container_id: required(attrs, keys::CONTAINER_ID)?.to_string(),
        content_path: required(attrs, keys::CONTENT_PATH)?.to_string(),
        content_version: parse(attrs, keys::CONTENT_VERSION)?,
        content_id: required(attrs, keys::CONTENT_ID)?.to_string(),
    })
}

/// Decoded consolidated address of `chunk_id`, if the key is present.
pub(crate) fn consolidated_fullpath(
    attrs: &Attributes,
    chunk_id: &ChunkId,
) -> StorageResult<Option<Fullpath>> {
    let key = fullpath_key(chunk_id);
    text(attrs, &key)?
        .map(|value| {
            Fullpath::decode(value).map_err(|e| StorageError::InvalidAttribute {
                key: key.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

/// Build a descriptor from raw attributes.
///
/// The consolidated key wins over legacy keys, so a file caught between the
/// two layouts reads the same either way. An undecodable consolidated value
/// falls back to the legacy keys when they are complete.
pub fn descriptor_from_attributes(
    attrs: &Attributes,
    chunk_id: &ChunkId,
) -> StorageResult<ChunkDescriptor> {
    if let Some(recorded) = text(attrs, keys::CHUNK_ID)?
        && !chunk_id.matches(recorded)
    {
        return Err(StorageError::ChunkIdMismatch {
            expected: chunk_id.to_string(),
            actual: recorded.to_string(),
        });
    }

    let address = match consolidated_fullpath(attrs, chunk_id) {
        Ok(Some(address)) => address,
        Ok(None) => legacy_fullpath(attrs)?,
        Err(invalid) => legacy_fullpath(attrs).map_err(|_| invalid)?,
    };

    Ok(ChunkDescriptor {
        container_id: address.container_id,
        content_id: address.content_id,
        content_path: address.content_path,
        content_version: address.content_version,
        chunk_id: chunk_id.clone(),
        position: required(attrs, keys::CHUNK_POSITION)?.to_string(),
        size: parse(attrs, keys::CHUNK_SIZE)?,
        hash: required(attrs, keys::CHUNK_HASH)?.to_string(),
        schema_version: text(attrs, keys::SCHEMA_VERSION)?.map(str::to_string),
    })
}
