//! Reverse-directory client errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RdirError {
    #[error("invalid rdir URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The service could not be reached in time. Retried on the next pass.
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service has no assignment for the volume, so every push of the
    /// pass would fail the same way.
    #[error("volume {volume_id} is unknown to the reverse directory")]
    VolumeNotFound { volume_id: String },

    #[error("rdir error ({status}): {body}")]
    Status { status: u16, body: String },
}

impl RdirError {
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    pub fn is_volume_wide(&self) -> bool {
        matches!(self, Self::VolumeNotFound { .. })
    }

    /// Classify a transport failure.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::Network(err.to_string())
        } else {
            Self::Http(err)
        }
    }
}

pub type RdirResult<T> = std::result::Result<T, RdirError>;
