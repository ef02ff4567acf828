//! Application layer for evac-council.
//!
//! Coordinates the domain state machine and defines the ports that
//! infrastructure adapters implement: the content-generation gateway,
//! the checkpoint store, the plan notifier, and the transition sink.

pub mod config;
pub mod ports;
pub mod use_cases;

pub use config::{ConfigError, WorkflowConfig};
pub use ports::checkpoint_store::{CheckpointError, CheckpointStore};
pub use ports::content_gateway::{ContentGateway, GatewayError};
pub use ports::notifier::{NotifyError, PlanNotifier};
pub use ports::transition_sink::{NoTransitionSink, TransitionEvent, TransitionSink};
pub use use_cases::{RunWorkflowUseCase, WorkflowError};
