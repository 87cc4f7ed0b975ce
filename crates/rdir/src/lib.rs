//! Client for the reverse-directory service.
//!
//! The indexer publishes one record per chunk through [`DirectoryIndex`];
//! [`RdirClient`] is the HTTP implementation.

pub mod client;
pub mod error;

pub use client::{DirectoryIndex, REQUEST_ID_HEADER, RdirClient};
pub use error::{RdirError, RdirResult};
