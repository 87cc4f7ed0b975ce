use chunkdex_core::ChunkId;
use chunkdex_core::attrs;
use chunkdex_storage::Attributes;
use std::path::{Path, PathBuf};

/// Deterministic chunk id derived from a seed.
pub fn chunk_id(seed: u8) -> ChunkId {
    ChunkId::parse(&format!("{seed:02X}").repeat(32)).unwrap()
}

/// Attributes of a chunk written before the consolidated layout.
pub fn legacy_attributes(id: &ChunkId, container_id: &str, content_path: &str) -> Attributes {
    [
        (attrs::CONTAINER_ID, container_id.to_string()),
        (attrs::CONTENT_ID, "0123456789ABCDEF".to_string()),
        (attrs::CONTENT_PATH, content_path.to_string()),
        (attrs::CONTENT_VERSION, "1456938361143740".to_string()),
        (attrs::CHUNK_ID, id.to_string()),
        (attrs::CHUNK_POSITION, "0".to_string()),
        (attrs::CHUNK_SIZE, "1024".to_string()),
        (attrs::CHUNK_HASH, "00000000000000000000000000000000".to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.into_bytes()))
    .collect()
}

/// Create an empty chunk file named after `id` under `dir`.
pub fn write_chunk(dir: &Path, id: &ChunkId) -> PathBuf {
    let path = dir.join(id.as_str());
    std::fs::write(&path, b"").unwrap();
    path
}

