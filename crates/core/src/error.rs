//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid chunk id: {0}")]
    InvalidChunkId(String),

    #[error("invalid fullpath: {0}")]
    InvalidFullpath(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
