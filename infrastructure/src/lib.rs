//! Infrastructure layer for evac-council.
//!
//! Adapters implementing the application ports: the figment/TOML
//! configuration loader, the JSON file checkpoint store, the HTTP
//! content-generation gateway, the Pushover notifier, and the JSONL
//! transition trace sink.

pub mod checkpoint;
pub mod config;
pub mod gateway;
pub mod notify;
pub mod trace;

pub use checkpoint::JsonCheckpointStore;
pub use config::{ConfigLoadError, ConfigLoader, FileConfig};
pub use gateway::HttpContentGateway;
pub use notify::PushoverNotifier;
pub use trace::JsonlTransitionSink;
