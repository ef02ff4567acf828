//! The checkpointable run state.

use super::stage::WorkflowStage;
use crate::consensus::{ConsensusResult, EvaluationVerdict};
use crate::firewall::SafeText;
use crate::plan::{PlanDraft, RevisionHistory};
use crate::risk::RiskAssessment;
use crate::route::{NoSafeRouteWarning, RouteSet};
use crate::scenario::Scenario;
use serde::{Deserialize, Serialize};

/// Terminal disposition of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WorkflowStatus {
    Running,
    Approved,
    Failed { reason: String },
    Aborted,
}

impl WorkflowStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WorkflowStatus::Running)
    }
}

/// The full context of one planning run.
///
/// Owned exclusively by the orchestrator, checkpointed after every stage
/// transition, and sufficient to resume the run after a process restart.
/// Keyed by `run_id` so concurrent runs never interfere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub run_id: String,
    pub stage: WorkflowStage,
    pub status: WorkflowStatus,

    /// The raw scenario document as received. Untrusted until sanitized.
    pub raw_input: String,
    /// Present once Sanitizing has completed.
    pub sanitized_input: Option<SafeText>,
    /// Present once Parsing has completed.
    pub scenario: Option<Scenario>,
    /// Present once Analyzing has completed.
    pub risk: Option<RiskAssessment>,
    /// Present once RoutePlanning has completed.
    pub routes: Option<RouteSet>,

    /// Draft currently under evaluation.
    pub current_draft: Option<PlanDraft>,
    /// Every draft produced by this run, oldest first.
    pub revision_history: RevisionHistory,
    /// One consensus result per evaluated draft, oldest first.
    pub consensus_history: Vec<ConsensusResult>,
    /// Verdicts collected during EvaluatingParallel, awaiting synthesis.
    /// Drained when the consensus result is recorded.
    pub pending_verdicts: Vec<EvaluationVerdict>,

    /// Non-fatal warnings accumulated across stages.
    pub warnings: Vec<NoSafeRouteWarning>,
    /// Number of proposal cycles started. Monotonically non-decreasing,
    /// bounded by the configured `max_iterations`.
    pub iteration: u32,
}

impl WorkflowState {
    pub fn new(run_id: impl Into<String>, raw_input: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            stage: WorkflowStage::Sanitizing,
            status: WorkflowStatus::Running,
            raw_input: raw_input.into(),
            sanitized_input: None,
            scenario: None,
            risk: None,
            routes: None,
            current_draft: None,
            revision_history: RevisionHistory::default(),
            consensus_history: Vec::new(),
            pending_verdicts: Vec::new(),
            warnings: Vec::new(),
            iteration: 0,
        }
    }

    /// Record a freshly proposed draft and count the proposal cycle.
    pub fn record_draft(&mut self, draft: PlanDraft) {
        self.current_draft = Some(draft.clone());
        self.revision_history.push(draft);
        self.iteration += 1;
    }

    pub fn record_consensus(&mut self, result: ConsensusResult) {
        self.consensus_history.push(result);
    }

    pub fn latest_consensus(&self) -> Option<&ConsensusResult> {
        self.consensus_history.last()
    }

    pub fn mark_approved(&mut self) {
        self.stage = WorkflowStage::Approved;
        self.status = WorkflowStatus::Approved;
    }

    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.stage = WorkflowStage::Failed;
        self.status = WorkflowStatus::Failed {
            reason: reason.into(),
        };
    }

    /// Mark the run aborted. The stage is left untouched so the
    /// checkpoint records where the run actually stopped.
    pub fn mark_aborted(&mut self) {
        self.status = WorkflowStatus::Aborted;
    }
}
