//! Indexer error types.

use chunkdex_rdir::RdirError;
use chunkdex_storage::StorageError;
use thiserror::Error;

/// Failure of one chunk update, or of start-up.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Rdir(#[from] RdirError),
}

/// How a chunk-level failure is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkFailure {
    MissingAttribute,
    Network,
    Other,
}

impl IndexError {
    /// Whether the whole volume is affected, which aborts the current pass.
    pub fn is_volume_wide(&self) -> bool {
        match self {
            Self::Config(_) => false,
            Self::Storage(e) => e.is_volume_wide(),
            Self::Rdir(e) => e.is_volume_wide(),
        }
    }

    pub fn failure_kind(&self) -> ChunkFailure {
        match self {
            Self::Storage(e) if e.is_missing_attribute() => ChunkFailure::MissingAttribute,
            Self::Rdir(e) if e.is_network() => ChunkFailure::Network,
            _ => ChunkFailure::Other,
        }
    }
}

impl From<chunkdex_core::Error> for IndexError {
    fn from(err: chunkdex_core::Error) -> Self {
        match err {
            chunkdex_core::Error::Config(msg) => Self::Config(msg),
            other => Self::Config(other.to_string()),
        }
    }
}
