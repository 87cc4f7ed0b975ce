pub mod fixtures;
pub mod mocks;

#[allow(unused_imports)]
pub use fixtures::{chunk_id, legacy_attributes, write_chunk};
#[allow(unused_imports)]
pub use mocks::{BackendOp, InstrumentedBackend};
