//! Checkpoint store port.
//!
//! The orchestrator persists [`WorkflowState`] here on every stage
//! transition, keyed by run id, so a crashed process can resume exactly
//! at the last completed stage instead of restarting the run.

use async_trait::async_trait;
use council_domain::{WorkflowStage, WorkflowState};
use thiserror::Error;

/// Persistence failure. Fatal to the current process but recoverable:
/// the run resumes from the last successful checkpoint on retry.
#[derive(Error, Debug)]
pub enum CheckpointError {
    #[error("Failed to persist checkpoint for run {run_id}: {message}")]
    SaveFailed { run_id: String, message: String },

    #[error("Failed to load checkpoint for run {run_id}: {message}")]
    LoadFailed { run_id: String, message: String },
}

/// Durable per-run state storage.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Persist the state as of entering `stage`. Overwrites the previous
    /// checkpoint for the same run.
    async fn save(
        &self,
        run_id: &str,
        stage: WorkflowStage,
        state: &WorkflowState,
    ) -> Result<(), CheckpointError>;

    /// Load the latest checkpoint for a run, if any.
    async fn load(&self, run_id: &str) -> Result<Option<WorkflowState>, CheckpointError>;
}
