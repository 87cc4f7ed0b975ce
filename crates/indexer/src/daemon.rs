//! The indexing daemon: periodic passes over one volume.

use crate::error::{ChunkFailure, IndexError};
use crate::ratelimit::ChunkRateLimiter;
use crate::stats::{PassStats, ReportTag};
use chunkdex_core::config::{AppConfig, IndexerConfig};
use chunkdex_core::{ChunkId, VolumeReference};
use chunkdex_rdir::{DirectoryIndex, RdirClient};
use chunkdex_storage::{
    AttributeStore, FilesystemXattrs, SchemaConverter, XattrBackend, check_root, probe_volume, walk,
};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use time::OffsetDateTime;

/// Result of one chunk update. Chunk-level failures never abort a pass.
#[derive(Debug)]
pub enum UpdateOutcome {
    Indexed,
    ChunkFailed(ChunkFailure),
    VolumeFailed(IndexError),
}

/// A pass stopped early because the volume itself is broken.
#[derive(Debug, Error)]
#[error("indexing pass aborted after {} chunks: {source}", .stats.attempted())]
pub struct PassAborted {
    /// Counters up to and including the failing chunk.
    pub stats: PassStats,
    #[source]
    pub source: IndexError,
}

pub struct IndexingDaemon {
    volume: VolumeReference,
    store: AttributeStore,
    converter: Option<SchemaConverter>,
    index: Arc<dyn DirectoryIndex>,
    limiter: ChunkRateLimiter,
    interval: Duration,
    report_interval: Duration,
    passes: u64,
}

impl IndexingDaemon {
    pub fn new(
        volume: VolumeReference,
        backend: Arc<dyn XattrBackend>,
        index: Arc<dyn DirectoryIndex>,
        config: &IndexerConfig,
    ) -> Self {
        let store = AttributeStore::new(backend);
        let converter = config
            .convert_chunks
            .then(|| SchemaConverter::new(store.clone()));
        Self {
            volume,
            store,
            converter,
            index,
            limiter: ChunkRateLimiter::new(config.chunks_per_second),
            interval: config.interval(),
            report_interval: config.report_interval(),
            passes: 0,
        }
    }

    /// Build a daemon for the local volume and HTTP reverse directory
    /// described by `config`. Every failure here is a configuration error.
    pub fn from_config(config: &AppConfig) -> Result<Self, IndexError> {
        config.validate()?;
        let root = config.indexer.volume_root()?;

        let backend: Arc<dyn XattrBackend> = Arc::new(FilesystemXattrs::new());
        let volume = probe_volume(
            root,
            backend.as_ref(),
            config.indexer.volume_id.as_deref(),
            config.indexer.namespace.as_deref(),
        )
        .map_err(|e| IndexError::Config(format!("cannot use volume {}: {e}", root.display())))?;

        let client = RdirClient::new(&config.rdir)
            .map_err(|e| IndexError::Config(e.to_string()))?;

        tracing::info!(
            volume_id = %volume.volume_id,
            namespace = %volume.namespace,
            root = %volume.root.display(),
            rdir_url = %client.base_url(),
            backend = backend.backend_name(),
            convert_chunks = config.indexer.convert_chunks,
            chunks_per_second = config.indexer.chunks_per_second,
            "Indexer configured"
        );

        Ok(Self::new(volume, backend, Arc::new(client), &config.indexer))
    }

    pub fn volume(&self) -> &VolumeReference {
        &self.volume
    }

    /// Completed, non-aborted passes.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Walk the whole volume once, publishing every chunk.
    pub async fn index_pass(&mut self) -> Result<PassStats, PassAborted> {
        let volume_id = self.volume.volume_id.clone();
        let mut stats = PassStats::start(Instant::now());
        stats
            .report(ReportTag::Started, self.passes, Instant::now())
            .log(&volume_id);

        if let Err(e) = check_root(&self.volume.root) {
            return Err(PassAborted {
                stats,
                source: e.into(),
            });
        }

        for path in walk(&self.volume.root) {
            let Some(chunk_id) = ChunkId::from_path(&path) else {
                tracing::warn!(path = %path.display(), "Skipping file with invalid chunk id");
                continue;
            };

            match self.safe_update(&path, &chunk_id).await {
                UpdateOutcome::Indexed => stats.record_success(),
                UpdateOutcome::ChunkFailed(_) => stats.record_error(),
                UpdateOutcome::VolumeFailed(source) => {
                    stats.record_error();
                    return Err(PassAborted { stats, source });
                }
            }

            self.limiter.throttle().await;

            let now = Instant::now();
            if stats.report_due(self.report_interval, now) {
                stats
                    .report(ReportTag::Running, self.passes, now)
                    .log(&volume_id);
            }
        }

        stats
            .report(ReportTag::Ended, self.passes, Instant::now())
            .log(&volume_id);
        self.passes += 1;
        Ok(stats)
    }

    /// Index one chunk, classifying any failure.
    pub async fn safe_update(&self, path: &Path, chunk_id: &ChunkId) -> UpdateOutcome {
        let err = match self.update_index(path, chunk_id).await {
            Ok(()) => return UpdateOutcome::Indexed,
            Err(e) => e,
        };

        if err.is_volume_wide() {
            tracing::error!(
                volume_id = %self.volume.volume_id,
                path = %path.display(),
                error = %err,
                "Volume failure, aborting pass"
            );
            return UpdateOutcome::VolumeFailed(err);
        }

        let kind = err.failure_kind();
        match kind {
            ChunkFailure::MissingAttribute => {
                tracing::warn!(path = %path.display(), error = %err, "Chunk is missing an attribute");
            }
            ChunkFailure::Network => {
                tracing::warn!(
                    path = %path.display(),
                    chunk_id = %chunk_id,
                    error = %err,
                    "Failed to reach reverse directory"
                );
            }
            ChunkFailure::Other => {
                tracing::error!(
                    path = %path.display(),
                    chunk_id = %chunk_id,
                    error = ?err,
                    "Failed to index chunk"
                );
            }
        }
        UpdateOutcome::ChunkFailed(kind)
    }

    /// Read the chunk's descriptor, converting it first when enabled, and
    /// push its record.
    pub async fn update_index(&self, path: &Path, chunk_id: &ChunkId) -> Result<(), IndexError> {
        let converted = match &self.converter {
            Some(converter) => converter.convert(path, chunk_id)?,
            None => None,
        };
        let descriptor = match converted {
            Some(descriptor) => descriptor,
            None => self.store.read_descriptor(path, chunk_id)?,
        };

        let mtime = OffsetDateTime::now_utc().unix_timestamp();
        let record = descriptor.to_index_record(&self.volume.volume_id, mtime);
        self.index.push(&record).await?;

        tracing::debug!(
            chunk_id = %chunk_id,
            container_id = %record.container_id,
            content_id = %record.content_id,
            "Indexed chunk"
        );
        Ok(())
    }

    /// Run exactly one pass, without start-up jitter.
    pub async fn run_once(&mut self) -> Result<PassStats, PassAborted> {
        let result = self.index_pass().await;
        if let Err(aborted) = &result {
            log_aborted(&self.volume.volume_id, aborted);
        }
        result
    }

    /// Index forever: a random start-up delay, then one pass per interval.
    pub async fn run(&mut self) {
        let jitter = startup_jitter(self.interval);
        tracing::info!(
            volume_id = %self.volume.volume_id,
            jitter_secs = jitter.as_secs(),
            interval_secs = self.interval.as_secs(),
            "Waiting before first pass"
        );
        tokio::time::sleep(jitter).await;

        loop {
            let started = Instant::now();
            if let Err(aborted) = self.index_pass().await {
                log_aborted(&self.volume.volume_id, &aborted);
            }
            tokio::time::sleep(self.interval.saturating_sub(started.elapsed())).await;
        }
    }
}

fn log_aborted(volume_id: &str, aborted: &PassAborted) {
    tracing::error!(
        volume_id = %volume_id,
        errors = aborted.stats.errors,
        chunks = aborted.stats.attempted(),
        error = %aborted.source,
        "Indexing pass aborted, retrying at next interval"
    );
}

/// Uniform random delay in `[0, interval)`.
pub fn startup_jitter(interval: Duration) -> Duration {
    interval.mul_f64(rand::random::<f64>())
}
