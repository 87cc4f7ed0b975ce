//! Chunk identifiers, descriptors and index records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::CHUNK_ID_LEN;

/// A chunk identifier: exactly [`CHUNK_ID_LEN`] hexadecimal digits.
///
/// The identifier is the file name of the chunk on its volume. Case is
/// preserved as found on disk; comparisons against attribute values are
/// case-insensitive.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChunkId(String);

impl ChunkId {
    /// Check whether `s` is a well-formed chunk identifier.
    pub fn is_valid(s: &str) -> bool {
        s.len() == CHUNK_ID_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Parse a chunk identifier.
    pub fn parse(s: &str) -> crate::Result<Self> {
        if !Self::is_valid(s) {
            return Err(crate::Error::InvalidChunkId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// Derive the identifier from the trailing segment of a chunk path.
    ///
    /// Returns `None` for anything that is not a chunk file name.
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        Self::parse(name).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Upper-case form, as used in the consolidated attribute key.
    pub fn to_upper(&self) -> String {
        self.0.to_ascii_uppercase()
    }

    /// Case-insensitive comparison with a raw identifier string.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl TryFrom<String> for ChunkId {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        if !Self::is_valid(&value) {
            return Err(crate::Error::InvalidChunkId(value));
        }
        Ok(Self(value))
    }
}

impl From<ChunkId> for String {
    fn from(id: ChunkId) -> Self {
        id.0
    }
}

impl fmt::Debug for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkId({})", &self.0[..16])
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the indexer knows about one chunk, as read from its attributes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkDescriptor {
    pub container_id: String,
    pub content_id: String,
    pub content_path: String,
    pub content_version: i64,
    pub chunk_id: ChunkId,
    pub position: String,
    pub size: u64,
    pub hash: String,
    /// Generation of the attribute schema that last wrote the file.
    /// `None` for files predating the version marker.
    pub schema_version: Option<String>,
}

impl ChunkDescriptor {
    /// Build the record pushed to the reverse directory.
    pub fn to_index_record(&self, volume_id: &str, mtime: i64) -> IndexRecord {
        IndexRecord {
            volume_id: volume_id.to_string(),
            container_id: self.container_id.clone(),
            content_id: self.content_id.clone(),
            chunk_id: self.chunk_id.clone(),
            mtime,
        }
    }
}

/// One reverse-directory entry. Built, pushed and dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    pub volume_id: String,
    pub container_id: String,
    pub content_id: String,
    pub chunk_id: ChunkId,
    /// Unix seconds at push time.
    pub mtime: i64,
}
