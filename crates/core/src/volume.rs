//! Volume identity.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The volume a daemon instance indexes. Fixed for the daemon's lifetime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeReference {
    /// Root directory holding the chunk files.
    pub root: PathBuf,
    /// Identifier the reverse directory files this volume's records under.
    pub volume_id: String,
    pub namespace: String,
}

impl VolumeReference {
    pub fn new(
        root: impl Into<PathBuf>,
        volume_id: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            volume_id: volume_id.into(),
            namespace: namespace.into(),
        }
    }
}
