use async_trait::async_trait;
use chunkdex_core::IndexRecord;
use chunkdex_rdir::{DirectoryIndex, RdirError, RdirResult};
use chunkdex_storage::error::{StorageError, StorageResult};
use chunkdex_storage::{Attributes, XattrBackend};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tokio::time::Instant;

/// Failure a [`RecordingIndex`] returns for a given push attempt.
#[derive(Clone, Copy, Debug)]
#[allow(dead_code)]
pub enum ScriptedFailure {
    Network,
    UnknownVolume,
    ServerError,
}

impl ScriptedFailure {
    fn to_error(self, record: &IndexRecord) -> RdirError {
        match self {
            Self::Network => RdirError::Network("connection refused".to_string()),
            Self::UnknownVolume => RdirError::VolumeNotFound {
                volume_id: record.volume_id.clone(),
            },
            Self::ServerError => RdirError::Status {
                status: 500,
                body: "internal error".to_string(),
            },
        }
    }
}

/// Directory double that stores successful pushes and fails scripted attempts.
#[derive(Default)]
pub struct RecordingIndex {
    records: Mutex<Vec<IndexRecord>>,
    attempts: Mutex<usize>,
    /// Clock reading at each attempt.
    attempt_times: Mutex<Vec<Instant>>,
    /// Failures keyed by 1-based attempt number.
    script: Mutex<HashMap<usize, ScriptedFailure>>,
}

#[allow(dead_code)]
impl RecordingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_attempt(&self, attempt: usize, failure: ScriptedFailure) {
        self.script.lock().unwrap().insert(attempt, failure);
    }

    pub fn records(&self) -> Vec<IndexRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }

    pub fn attempt_times(&self) -> Vec<Instant> {
        self.attempt_times.lock().unwrap().clone()
    }
}

#[async_trait]
impl DirectoryIndex for RecordingIndex {
    async fn push(&self, record: &IndexRecord) -> RdirResult<()> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            *attempts += 1;
            self.attempt_times.lock().unwrap().push(Instant::now());
            *attempts
        };
        if let Some(failure) = self.script.lock().unwrap().get(&attempt) {
            return Err(failure.to_error(record));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Backend of a filesystem mounted without extended attribute support.
pub struct UnsupportedXattrs;

impl XattrBackend for UnsupportedXattrs {
    fn read_all(&self, path: &Path) -> StorageResult<Attributes> {
        Err(StorageError::Unsupported(path.to_path_buf()))
    }

    fn set(&self, path: &Path, _key: &str, _value: &[u8]) -> StorageResult<()> {
        Err(StorageError::Unsupported(path.to_path_buf()))
    }

    fn remove(&self, path: &Path, _key: &str) -> StorageResult<()> {
        Err(StorageError::Unsupported(path.to_path_buf()))
    }

    fn backend_name(&self) -> &'static str {
        "unsupported"
    }
}
