//! Extended-attribute layout of chunk files and volume roots.
//!
//! Key names are logical: the storage layer maps them into the `user.`
//! namespace of the filesystem.
//!
//! Two schema generations coexist on disk:
//! - legacy: one key per field (`grid.content.container`, `grid.content.id`, ...)
//! - consolidated: a single `oio.content.fullpath:<CHUNK_ID>` key whose value
//!   encodes container, path, version and content id, plus a version marker.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::ChunkId;
use crate::error::{Error, Result};

/// Namespace prefix applied by filesystem backends.
pub const USER_NAMESPACE: &str = "user.";

pub const CONTAINER_ID: &str = "grid.content.container";
pub const CONTENT_ID: &str = "grid.content.id";
pub const CONTENT_PATH: &str = "grid.content.path";
pub const CONTENT_VERSION: &str = "grid.content.version";
pub const CHUNK_ID: &str = "grid.chunk.id";

pub const CHUNK_POSITION: &str = "grid.chunk.position";
pub const CHUNK_SIZE: &str = "grid.chunk.size";
pub const CHUNK_HASH: &str = "grid.chunk.hash";

/// Records which schema generation last wrote the file.
pub const SCHEMA_VERSION: &str = "grid.oio.version";

/// Schema generation written by the converter.
pub const CURRENT_SCHEMA_VERSION: &str = "4.2";

pub const FULLPATH_PREFIX: &str = "oio.content.fullpath:";

/// Keys superseded by the consolidated key, in removal order.
pub const LEGACY_KEYS: [&str; 5] = [
    CHUNK_ID,
    CONTAINER_ID,
    CONTENT_PATH,
    CONTENT_VERSION,
    CONTENT_ID,
];

pub const VOLUME_ID: &str = "server.id";
pub const VOLUME_NAMESPACE: &str = "server.ns";
pub const VOLUME_TYPE: &str = "server.type";
pub const VOLUME_TYPE_RAWX: &str = "rawx";

/// Characters left as-is in fullpath segments: alphanumerics and `_.-~`.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

/// Consolidated key name for a chunk.
pub fn fullpath_key(chunk_id: &ChunkId) -> String {
    format!("{FULLPATH_PREFIX}{}", chunk_id.to_upper())
}

/// Logical address stored under the consolidated key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fullpath {
    pub container_id: String,
    pub content_path: String,
    pub content_version: i64,
    pub content_id: String,
}

impl Fullpath {
    /// Encode as `<container>/<path>/<version>/<content>`, each segment percent-encoded.
    pub fn encode(&self) -> String {
        let version = self.content_version.to_string();
        [
            self.container_id.as_str(),
            self.content_path.as_str(),
            version.as_str(),
            self.content_id.as_str(),
        ]
        .iter()
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
    }

    pub fn decode(value: &str) -> Result<Self> {
        let segments = value
            .split('/')
            .map(|s| {
                percent_decode_str(s)
                    .decode_utf8()
                    .map(|d| d.into_owned())
                    .map_err(|e| Error::InvalidFullpath(format!("{value}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        let [container_id, content_path, version, content_id]: [String; 4] =
            segments.try_into().map_err(|parts: Vec<String>| {
                Error::InvalidFullpath(format!(
                    "{value}: expected 4 segments, got {}",
                    parts.len()
                ))
            })?;

        let content_version = version
            .parse::<i64>()
            .map_err(|e| Error::InvalidFullpath(format!("{value}: bad version: {e}")))?;

        Ok(Self {
            container_id,
            content_path,
            content_version,
            content_id,
        })
    }
}
