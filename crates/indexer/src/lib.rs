//! Chunk indexing daemon.
//!
//! Periodically walks one storage volume, reads the descriptor of every
//! chunk file from its extended attributes and publishes it to the reverse
//! directory, optionally migrating legacy attributes on the way.

pub mod daemon;
pub mod error;
pub mod ratelimit;
pub mod settings;
pub mod stats;

pub use daemon::{IndexingDaemon, PassAborted, UpdateOutcome, startup_jitter};
pub use error::{ChunkFailure, IndexError};
pub use ratelimit::ChunkRateLimiter;
pub use stats::{PassStats, ProgressReport, ReportTag};
