//! Online migration of chunk attributes to the consolidated layout.
//!
//! Write order is what keeps every chunk readable across a crash:
//! 1. the consolidated key is written while all legacy keys are still present;
//! 2. legacy keys are removed, best effort;
//! 3. the version marker is bumped.
//!
//! A crash after (1) leaves both layouts on disk; readers prefer the
//! consolidated key and the next conversion finishes steps (2) and (3).

use crate::attributes::{AttributeStore, consolidated_fullpath, descriptor_from_attributes};
use crate::error::StorageResult;
use crate::traits::Attributes;
use chunkdex_core::attrs::{CURRENT_SCHEMA_VERSION, LEGACY_KEYS, SCHEMA_VERSION, fullpath_key};
use chunkdex_core::{ChunkDescriptor, ChunkId, Fullpath};
use std::path::Path;

pub struct SchemaConverter {
    store: AttributeStore,
}

impl SchemaConverter {
    pub fn new(store: AttributeStore) -> Self {
        Self { store }
    }

    /// Convert one chunk file.
    ///
    /// Returns `None` when the file already carries a readable consolidated
    /// key; the caller then reads the descriptor directly. Returns the new
    /// descriptor after a conversion. An undecodable consolidated value is
    /// rewritten from the legacy keys, which are kept if they are incomplete.
    pub fn convert(&self, path: &Path, chunk_id: &ChunkId) -> StorageResult<Option<ChunkDescriptor>> {
        let attrs = self.store.read_attributes(path)?;
        let key = fullpath_key(chunk_id);

        match consolidated_fullpath(&attrs, chunk_id) {
            Ok(Some(_)) => {
                self.complete_interrupted(path, &attrs)?;
                return Ok(None);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Unreadable consolidated key, rebuilding from legacy attributes"
                );
            }
        }

        // Validate everything before the first write so a chunk we cannot
        // index is left exactly as found.
        let mut descriptor = descriptor_from_attributes(&attrs, chunk_id)?;
        let value = Fullpath {
            container_id: descriptor.container_id.clone(),
            content_path: descriptor.content_path.clone(),
            content_version: descriptor.content_version,
            content_id: descriptor.content_id.clone(),
        }
        .encode();

        self.store.write_keys(path, &[(&key, value.as_bytes())], &[])?;
        for legacy in LEGACY_KEYS {
            self.store.remove_quietly(path, legacy);
        }
        self.store.write_keys(
            path,
            &[(SCHEMA_VERSION, CURRENT_SCHEMA_VERSION.as_bytes())],
            &[],
        )?;

        tracing::debug!(
            path = %path.display(),
            chunk_id = %chunk_id,
            "Converted chunk attributes"
        );

        descriptor.schema_version = Some(CURRENT_SCHEMA_VERSION.to_string());
        Ok(Some(descriptor))
    }

    /// Finish a conversion that stopped after writing the consolidated key.
    /// No writes happen on a fully converted file.
    fn complete_interrupted(&self, path: &Path, attrs: &Attributes) -> StorageResult<()> {
        let leftovers: Vec<&str> = LEGACY_KEYS
            .into_iter()
            .filter(|key| attrs.contains_key(*key))
            .collect();
        let version_current = attrs.get(SCHEMA_VERSION).map(Vec::as_slice)
            == Some(CURRENT_SCHEMA_VERSION.as_bytes());

        if leftovers.is_empty() && version_current {
            return Ok(());
        }

        tracing::info!(
            path = %path.display(),
            leftover_keys = leftovers.len(),
            "Completing interrupted attribute conversion"
        );
        for legacy in leftovers {
            self.store.remove_quietly(path, legacy);
        }
        self.store.write_keys(
            path,
            &[(SCHEMA_VERSION, CURRENT_SCHEMA_VERSION.as_bytes())],
            &[],
        )
    }
}
