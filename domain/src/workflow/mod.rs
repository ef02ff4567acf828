//! Workflow state machine: stages, the transition table, and the
//! checkpointable run state.

mod stage;
mod state;

pub use stage::{StageOutcome, WorkflowStage, next_stage};
pub use state::{WorkflowState, WorkflowStatus};
