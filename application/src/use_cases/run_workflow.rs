//! The planning run orchestrator.
//!
//! Drives the checkpointed state machine from `Sanitizing` to a terminal
//! stage. Every transition follows the explicit table in
//! [`council_domain::workflow`], is reported to the transition sink, and
//! is persisted before the next stage executes, so a crashed process can
//! resume at the last completed stage.

use crate::config::{ConfigError, WorkflowConfig};
use crate::ports::checkpoint_store::{CheckpointError, CheckpointStore};
use crate::ports::content_gateway::ContentGateway;
use crate::ports::notifier::PlanNotifier;
use crate::ports::transition_sink::{TransitionEvent, TransitionSink};
use crate::use_cases::{evaluate_plan, propose_plan};
use council_domain::{
    Scenario, StageOutcome, WorkflowStage, WorkflowState, WorkflowStatus, firewall, next_stage,
    risk, route, synthesize,
};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Process-level orchestration failures.
///
/// Domain failures (injection, schema violations, iteration cap) are not
/// errors here: they end the run with a `Failed` status. This type is for
/// the process itself going wrong, most importantly a checkpoint that
/// could not be written.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    #[error("No checkpoint found for run {run_id}")]
    UnknownRun { run_id: String },

    #[error("No transition from stage {stage} on outcome {outcome:?}")]
    InvalidTransition {
        stage: WorkflowStage,
        outcome: StageOutcome,
    },
}

/// Runs one evacuation planning workflow end to end.
pub struct RunWorkflowUseCase<G: ContentGateway + 'static> {
    gateway: Arc<G>,
    checkpoints: Arc<dyn CheckpointStore>,
    notifier: Arc<dyn PlanNotifier>,
    transitions: Arc<dyn TransitionSink>,
    config: WorkflowConfig,
}

impl<G: ContentGateway + 'static> RunWorkflowUseCase<G> {
    pub fn new(
        gateway: Arc<G>,
        checkpoints: Arc<dyn CheckpointStore>,
        notifier: Arc<dyn PlanNotifier>,
        transitions: Arc<dyn TransitionSink>,
        config: WorkflowConfig,
    ) -> Result<Self, WorkflowError> {
        config.validate()?;
        Ok(Self {
            gateway,
            checkpoints,
            notifier,
            transitions,
            config,
        })
    }

    /// Start a new run over a raw scenario document.
    pub async fn run(
        &self,
        run_id: &str,
        raw_input: &str,
        cancel: &CancellationToken,
    ) -> Result<WorkflowState, WorkflowError> {
        info!(run_id, "starting planning run");
        let state = WorkflowState::new(run_id, raw_input);
        self.drive(state, cancel).await
    }

    /// Resume a run from its last checkpoint.
    ///
    /// A run that already reached a terminal stage is returned as-is.
    pub async fn resume(
        &self,
        run_id: &str,
        cancel: &CancellationToken,
    ) -> Result<WorkflowState, WorkflowError> {
        let state = self
            .checkpoints
            .load(run_id)
            .await?
            .ok_or_else(|| WorkflowError::UnknownRun {
                run_id: run_id.to_string(),
            })?;
        if state.status.is_terminal() {
            info!(run_id, stage = %state.stage, "run already terminal, nothing to resume");
            return Ok(state);
        }
        info!(run_id, stage = %state.stage, "resuming run from checkpoint");
        self.drive(state, cancel).await
    }

    async fn drive(
        &self,
        mut state: WorkflowState,
        cancel: &CancellationToken,
    ) -> Result<WorkflowState, WorkflowError> {
        loop {
            // Cancellation is honored only between stages, so the
            // checkpoint always reflects a completed transition.
            if cancel.is_cancelled() {
                warn!(run_id = %state.run_id, stage = %state.stage, "run aborted");
                state.mark_aborted();
                self.checkpoints
                    .save(&state.run_id, state.stage, &state)
                    .await?;
                return Ok(state);
            }

            let from = state.stage;
            let outcome = self.step(&mut state).await;
            let to = next_stage(from, outcome)
                .ok_or(WorkflowError::InvalidTransition { stage: from, outcome })?;
            state.stage = to;
            if outcome == StageOutcome::Approve {
                state.mark_approved();
            }

            debug!(run_id = %state.run_id, from = %from, to = %to, "stage transition");
            self.transitions
                .record(&TransitionEvent::now(&state.run_id, from, to, state.iteration));
            self.checkpoints.save(&state.run_id, to, &state).await?;

            if to.is_terminal() {
                if state.status == WorkflowStatus::Approved {
                    self.deliver(&state).await;
                }
                return Ok(state);
            }
        }
    }

    /// Execute the current stage, mutating the state in place.
    ///
    /// Domain failures call `mark_failed` with an operator-readable
    /// reason and return `Fail`; they never bubble as `Err`.
    async fn step(&self, state: &mut WorkflowState) -> StageOutcome {
        match state.stage {
            WorkflowStage::Sanitizing => match firewall::sanitize(&state.raw_input) {
                Ok(safe) => {
                    state.sanitized_input = Some(safe);
                    StageOutcome::Advance
                }
                Err(e) => {
                    warn!(run_id = %state.run_id, reason = %e, "input rejected by firewall");
                    state.mark_failed(format!("input rejected: {}", e));
                    StageOutcome::Fail
                }
            },

            WorkflowStage::Parsing => {
                let Some(safe) = state.sanitized_input.clone() else {
                    state.mark_failed("parsing reached without sanitized input");
                    return StageOutcome::Fail;
                };
                match Scenario::parse(&safe) {
                    Ok(scenario) => {
                        info!(
                            run_id = %state.run_id,
                            threats = scenario.threats().len(),
                            assets = scenario.assets().len(),
                            "scenario parsed"
                        );
                        state.scenario = Some(scenario);
                        StageOutcome::Advance
                    }
                    Err(e) => {
                        state.mark_failed(e.to_string());
                        StageOutcome::Fail
                    }
                }
            }

            WorkflowStage::Analyzing => {
                let Some(scenario) = &state.scenario else {
                    state.mark_failed("analyzing reached without a scenario");
                    return StageOutcome::Fail;
                };
                let assessment = risk::assess(scenario);
                info!(
                    run_id = %state.run_id,
                    at_risk = assessment.at_risk_assets().count(),
                    "risk assessed"
                );
                state.risk = Some(assessment);
                StageOutcome::Advance
            }

            WorkflowStage::RoutePlanning => {
                let (Some(scenario), Some(assessment)) = (&state.scenario, &state.risk) else {
                    state.mark_failed("route planning reached without a risk assessment");
                    return StageOutcome::Fail;
                };
                let routes = route::plan_routes(scenario, assessment);
                for warning in routes.warnings() {
                    warn!(
                        run_id = %state.run_id,
                        asset = %warning.asset_id,
                        reason = %warning.reason,
                        "no safe route"
                    );
                }
                state.warnings.extend(routes.warnings().iter().cloned());
                state.routes = Some(routes);
                StageOutcome::Advance
            }

            WorkflowStage::Proposing => match propose_plan::propose(&*self.gateway, state).await {
                Ok(draft) => {
                    info!(
                        run_id = %state.run_id,
                        revision = draft.revision,
                        "plan drafted"
                    );
                    state.record_draft(draft);
                    StageOutcome::Advance
                }
                Err(e) => {
                    state.mark_failed(format!("proposal failed: {}", e));
                    StageOutcome::Fail
                }
            },

            WorkflowStage::EvaluatingParallel => {
                let (Some(draft), Some(scenario)) = (&state.current_draft, &state.scenario) else {
                    state.mark_failed("evaluation reached without a draft");
                    return StageOutcome::Fail;
                };
                state.pending_verdicts =
                    evaluate_plan::evaluate(&self.gateway, &self.config, draft, scenario).await;
                StageOutcome::Advance
            }

            WorkflowStage::Synthesizing => {
                let mut verdicts = std::mem::take(&mut state.pending_verdicts).into_iter();
                let (Some(operational), Some(social), Some(economic)) =
                    (verdicts.next(), verdicts.next(), verdicts.next())
                else {
                    state.mark_failed("synthesis reached without a full council");
                    return StageOutcome::Fail;
                };
                let result =
                    synthesize(operational, social, economic, &self.config.compensation);
                info!(
                    run_id = %state.run_id,
                    iteration = state.iteration,
                    approved = result.approved,
                    verdicts = %result.verdict_summary(),
                    "consensus synthesized"
                );
                let approved = result.approved;
                state.record_consensus(result);
                if approved {
                    StageOutcome::Approve
                } else {
                    StageOutcome::Retry
                }
            }

            WorkflowStage::RetryProposing => {
                if state.iteration >= self.config.max_iterations {
                    state.mark_failed(format!(
                        "iteration limit exceeded after {} attempt(s)",
                        state.iteration
                    ));
                    StageOutcome::Fail
                } else {
                    StageOutcome::Advance
                }
            }

            WorkflowStage::Approved | WorkflowStage::Failed => {
                state.mark_failed(format!("step invoked on terminal stage {}", state.stage));
                StageOutcome::Fail
            }
        }
    }

    /// Hand the approved plan to the notifier. Delivery failure is logged
    /// and never invalidates the approval.
    async fn deliver(&self, state: &WorkflowState) {
        let (Some(draft), Some(scenario)) = (&state.current_draft, &state.scenario) else {
            return;
        };
        match self.notifier.notify(&state.run_id, draft, scenario).await {
            Ok(()) => info!(run_id = %state.run_id, "approved plan delivered"),
            Err(e) => {
                error!(run_id = %state.run_id, error = %e, "notification failed, approval stands");
            }
        }
    }
}
