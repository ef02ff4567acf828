//! Stages and the explicit transition table.
//!
//! The orchestrator never branches ad hoc: every edge of the state
//! machine is a row in [`next_stage`], and an edge that is not in the
//! table is a programming error surfaced as `None`.

use serde::{Deserialize, Serialize};

/// The stages of one planning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    Sanitizing,
    Parsing,
    Analyzing,
    RoutePlanning,
    Proposing,
    EvaluatingParallel,
    Synthesizing,
    RetryProposing,
    Approved,
    Failed,
}

impl WorkflowStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStage::Sanitizing => "sanitizing",
            WorkflowStage::Parsing => "parsing",
            WorkflowStage::Analyzing => "analyzing",
            WorkflowStage::RoutePlanning => "route_planning",
            WorkflowStage::Proposing => "proposing",
            WorkflowStage::EvaluatingParallel => "evaluating_parallel",
            WorkflowStage::Synthesizing => "synthesizing",
            WorkflowStage::RetryProposing => "retry_proposing",
            WorkflowStage::Approved => "approved",
            WorkflowStage::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowStage::Approved | WorkflowStage::Failed)
    }
}

impl std::fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of executing one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// Stage completed; move along the linear pipeline.
    Advance,
    /// Consensus approved the draft.
    Approve,
    /// Consensus rejected the draft and the iteration budget allows
    /// another attempt.
    Retry,
    /// Unrecoverable stage error or iteration cap exceeded.
    Fail,
}

/// The transition table: `(stage, outcome) -> next stage`.
///
/// `Fail` is valid from every non-terminal stage; terminal stages have
/// no outgoing edges.
pub fn next_stage(stage: WorkflowStage, outcome: StageOutcome) -> Option<WorkflowStage> {
    use StageOutcome::*;
    use WorkflowStage::*;

    match (stage, outcome) {
        (Sanitizing, Advance) => Some(Parsing),
        (Parsing, Advance) => Some(Analyzing),
        (Analyzing, Advance) => Some(RoutePlanning),
        (RoutePlanning, Advance) => Some(Proposing),
        (Proposing, Advance) => Some(EvaluatingParallel),
        (EvaluatingParallel, Advance) => Some(Synthesizing),
        (Synthesizing, Approve) => Some(Approved),
        (Synthesizing, Retry) => Some(RetryProposing),
        (RetryProposing, Advance) => Some(Proposing),
        (s, Fail) if !s.is_terminal() => Some(Failed),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_path_reaches_synthesis() {
        let mut stage = WorkflowStage::Sanitizing;
        let path = [
            WorkflowStage::Parsing,
            WorkflowStage::Analyzing,
            WorkflowStage::RoutePlanning,
            WorkflowStage::Proposing,
            WorkflowStage::EvaluatingParallel,
            WorkflowStage::Synthesizing,
        ];
        for expected in path {
            stage = next_stage(stage, StageOutcome::Advance).unwrap();
            assert_eq!(stage, expected);
        }
    }

    #[test]
    fn synthesis_branches() {
        assert_eq!(
            next_stage(WorkflowStage::Synthesizing, StageOutcome::Approve),
            Some(WorkflowStage::Approved)
        );
        assert_eq!(
            next_stage(WorkflowStage::Synthesizing, StageOutcome::Retry),
            Some(WorkflowStage::RetryProposing)
        );
        assert_eq!(
            next_stage(WorkflowStage::RetryProposing, StageOutcome::Advance),
            Some(WorkflowStage::Proposing)
        );
    }

    #[test]
    fn fail_is_valid_from_any_non_terminal_stage() {
        for stage in [
            WorkflowStage::Sanitizing,
            WorkflowStage::Parsing,
            WorkflowStage::Analyzing,
            WorkflowStage::RoutePlanning,
            WorkflowStage::Proposing,
            WorkflowStage::EvaluatingParallel,
            WorkflowStage::Synthesizing,
            WorkflowStage::RetryProposing,
        ] {
            assert_eq!(
                next_stage(stage, StageOutcome::Fail),
                Some(WorkflowStage::Failed)
            );
        }
    }

    #[test]
    fn terminal_stages_have_no_edges() {
        for outcome in [
            StageOutcome::Advance,
            StageOutcome::Approve,
            StageOutcome::Retry,
            StageOutcome::Fail,
        ] {
            assert_eq!(next_stage(WorkflowStage::Approved, outcome), None);
            assert_eq!(next_stage(WorkflowStage::Failed, outcome), None);
        }
    }

    #[test]
    fn invalid_edges_are_rejected() {
        assert_eq!(
            next_stage(WorkflowStage::Parsing, StageOutcome::Approve),
            None
        );
        assert_eq!(next_stage(WorkflowStage::Proposing, StageOutcome::Retry), None);
    }
}
