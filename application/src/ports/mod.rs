//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod checkpoint_store;
pub mod content_gateway;
pub mod notifier;
pub mod transition_sink;
