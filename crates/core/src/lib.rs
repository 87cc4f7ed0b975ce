//! Core domain types for the chunk indexer.
//!
//! This crate defines the data model shared by the other crates:
//! - Chunk identifiers, descriptors and reverse-directory records
//! - The extended-attribute layout of chunk files and volume roots
//! - Volume identity
//! - Configuration

pub mod attrs;
pub mod chunk;
pub mod config;
pub mod error;
pub mod volume;

pub use attrs::Fullpath;
pub use chunk::{ChunkDescriptor, ChunkId, IndexRecord};
pub use error::{Error, Result};
pub use volume::VolumeReference;

/// Length of a chunk identifier in hex digits.
pub const CHUNK_ID_LEN: usize = 64;
