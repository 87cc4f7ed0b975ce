pub mod fixtures;
pub mod mocks;

#[allow(unused_imports)]
pub use fixtures::{VolumeFixture, chunk_id};
#[allow(unused_imports)]
pub use mocks::{RecordingIndex, ScriptedFailure, UnsupportedXattrs};
