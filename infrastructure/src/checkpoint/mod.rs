//! Durable per-run checkpoint storage.

mod json_store;

pub use json_store::JsonCheckpointStore;
