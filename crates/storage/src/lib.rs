//! Chunk volume access for the indexer.
//!
//! This crate provides:
//! - Extended-attribute backends: local filesystem and in-memory
//! - Typed chunk descriptor reads and multi-key writes
//! - Online conversion of legacy attributes to the consolidated layout
//! - Lazy volume tree walks and volume identification

pub mod attributes;
pub mod backends;
pub mod converter;
pub mod error;
pub mod traits;
pub mod volume;
pub mod walker;

pub use attributes::AttributeStore;
pub use backends::{filesystem::FilesystemXattrs, memory::MemoryXattrs};
pub use converter::SchemaConverter;
pub use error::{StorageError, StorageResult};
pub use traits::{Attributes, XattrBackend};
pub use volume::{check_root, probe_volume};
pub use walker::{ChunkPaths, walk};
