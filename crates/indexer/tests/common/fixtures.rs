use chunkdex_core::config::IndexerConfig;
use chunkdex_core::{ChunkId, VolumeReference, attrs};
use chunkdex_indexer::IndexingDaemon;
use chunkdex_rdir::DirectoryIndex;
use chunkdex_storage::{Attributes, MemoryXattrs, XattrBackend};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub const VOLUME_ID: &str = "127.0.0.1:6201";

/// Deterministic chunk id derived from a seed.
pub fn chunk_id(seed: u8) -> ChunkId {
    ChunkId::parse(&format!("{seed:02X}").repeat(32)).unwrap()
}

/// A temporary volume whose chunk attributes live in a [`MemoryXattrs`].
pub struct VolumeFixture {
    pub dir: TempDir,
    pub xattrs: Arc<MemoryXattrs>,
}

#[allow(dead_code)]
impl VolumeFixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            xattrs: Arc::new(MemoryXattrs::new()),
        }
    }

    pub fn volume(&self) -> VolumeReference {
        VolumeReference::new(self.dir.path(), VOLUME_ID, "OPENIO")
    }

    /// Create a chunk file with a complete set of legacy attributes, under a
    /// subdirectory named after the first three hex digits as rawx does.
    pub fn add_chunk(&self, seed: u8) -> (ChunkId, PathBuf) {
        let id = chunk_id(seed);
        let attrs = Self::legacy_attributes(&id, &format!("CONTAINER{seed:02X}"));
        let path = self.add_file(&format!("{}/{}", &id.as_str()[..3], id));
        self.xattrs.insert_all(&path, attrs);
        (id, path)
    }

    /// Create a chunk file whose attributes lack `key`.
    pub fn add_chunk_without(&self, seed: u8, key: &str) -> (ChunkId, PathBuf) {
        let (id, path) = self.add_chunk(seed);
        let mut attrs = self.xattrs.snapshot(&path).unwrap();
        attrs.remove(key);
        self.xattrs.insert_all(&path, attrs);
        (id, path)
    }

    /// Create a plain file, with any intermediate directories.
    pub fn add_file(&self, relative: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, b"chunk data").unwrap();
        path
    }

    pub fn legacy_attributes(id: &ChunkId, container_id: &str) -> Attributes {
        [
            (attrs::CONTAINER_ID, container_id.to_string()),
            (attrs::CONTENT_ID, "0123456789ABCDEF".to_string()),
            (attrs::CONTENT_PATH, "object".to_string()),
            (attrs::CONTENT_VERSION, "1".to_string()),
            (attrs::CHUNK_ID, id.to_string()),
            (attrs::CHUNK_POSITION, "0".to_string()),
            (attrs::CHUNK_SIZE, "10".to_string()),
            (attrs::CHUNK_HASH, "5D41402ABC4B2A76B9719D911017C592".to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.into_bytes()))
        .collect()
    }

    pub fn config(&self) -> IndexerConfig {
        IndexerConfig {
            volume: Some(self.dir.path().to_path_buf()),
            chunks_per_second: 0,
            ..IndexerConfig::default()
        }
    }

    pub fn daemon(&self, index: Arc<dyn DirectoryIndex>) -> IndexingDaemon {
        self.daemon_with(index, self.xattrs.clone(), self.config())
    }

    pub fn daemon_with(
        &self,
        index: Arc<dyn DirectoryIndex>,
        backend: Arc<dyn XattrBackend>,
        config: IndexerConfig,
    ) -> IndexingDaemon {
        IndexingDaemon::new(self.volume(), backend, index, &config)
    }
}
