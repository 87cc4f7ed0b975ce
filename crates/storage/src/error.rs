//! Storage error types.

use std::path::PathBuf;
use thiserror::Error;

/// Volume access errors.
///
/// Errors are either local to one chunk file or volume-wide; see
/// [`StorageError::is_volume_wide`].
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("missing extended attribute {0}")]
    MissingAttribute(String),

    #[error("invalid extended attribute {key}: {reason}")]
    InvalidAttribute { key: String, reason: String },

    #[error("chunk id mismatch: file name {expected}, attribute {actual}")]
    ChunkIdMismatch { expected: String, actual: String },

    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("extended attributes not supported on {}", .0.display())]
    Unsupported(PathBuf),

    #[error("read-only filesystem at {}", .0.display())]
    ReadOnly(PathBuf),

    #[error("volume unavailable at {}: {reason}", .path.display())]
    VolumeUnavailable { path: PathBuf, reason: String },

    #[error("volume not initialized: {0}")]
    VolumeNotInitialized(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Whether the error is a property of the whole volume rather than of one
    /// chunk. Retrying other chunks of the same volume would fail identically.
    pub fn is_volume_wide(&self) -> bool {
        matches!(
            self,
            Self::Unsupported(_)
                | Self::ReadOnly(_)
                | Self::VolumeUnavailable { .. }
                | Self::VolumeNotInitialized(_)
        )
    }

    pub fn is_missing_attribute(&self) -> bool {
        matches!(self, Self::MissingAttribute(_))
    }

    /// Map an OS error raised while touching `path`.
    pub(crate) fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        match err.raw_os_error() {
            Some(code) if code == libc::ENOTSUP || code == libc::EOPNOTSUPP => {
                return Self::Unsupported(path.to_path_buf());
            }
            Some(libc::EROFS) => return Self::ReadOnly(path.to_path_buf()),
            _ => {}
        }
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::Unsupported => Self::Unsupported(path.to_path_buf()),
            _ => Self::Io(err),
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
