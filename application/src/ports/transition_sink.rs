//! Transition trace sink port.
//!
//! Receives one event per state transition. Implementations live in the
//! infrastructure layer (e.g. a JSONL file); the orchestrator never
//! depends on delivery.

use chrono::{DateTime, Utc};
use council_domain::WorkflowStage;
use serde::{Deserialize, Serialize};

/// One edge of the state machine, as observed at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub run_id: String,
    pub from_stage: WorkflowStage,
    pub to_stage: WorkflowStage,
    pub timestamp: DateTime<Utc>,
    pub iteration: u32,
}

impl TransitionEvent {
    pub fn now(
        run_id: impl Into<String>,
        from_stage: WorkflowStage,
        to_stage: WorkflowStage,
        iteration: u32,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            from_stage,
            to_stage,
            timestamp: Utc::now(),
            iteration,
        }
    }
}

/// Observer for state transitions.
pub trait TransitionSink: Send + Sync {
    fn record(&self, event: &TransitionEvent);
}

/// No-op sink for when tracing is not needed.
pub struct NoTransitionSink;

impl TransitionSink for NoTransitionSink {
    fn record(&self, _event: &TransitionEvent) {}
}
