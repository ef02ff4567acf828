//! CLI entrypoint for evac-council.
//!
//! Wires the layers together with dependency injection and runs one
//! planning workflow end to end.

mod cli;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use clap::Parser;
use cli::{Cli, Command};
use council_application::{
    CheckpointStore, NoTransitionSink, NotifyError, PlanNotifier, RunWorkflowUseCase,
    TransitionSink,
};
use council_domain::{PlanDraft, Scenario, WorkflowStatus};
use council_infrastructure::{
    ConfigLoader, FileConfig, HttpContentGateway, JsonCheckpointStore, JsonlTransitionSink,
    PushoverNotifier,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Notifier used when push delivery is disabled in config.
struct DisabledNotifier;

#[async_trait]
impl PlanNotifier for DisabledNotifier {
    async fn notify(
        &self,
        run_id: &str,
        _draft: &PlanDraft,
        _scenario: &Scenario,
    ) -> Result<(), NotifyError> {
        info!(run_id, "notifications disabled, approved plan not pushed");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let filter = match args.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // The non-blocking writer guard must outlive the run.
    let _guard = match &args.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
            None
        }
    };

    match args.command {
        Command::Run {
            scenario,
            config,
            run_id,
            resume,
            checkpoint_dir,
            trace_file,
        } => {
            run(scenario, config, run_id, resume, checkpoint_dir, trace_file).await
        }
    }
}

async fn run(
    scenario_path: PathBuf,
    config_path: Option<PathBuf>,
    run_id: Option<String>,
    resume: bool,
    checkpoint_dir: Option<PathBuf>,
    trace_file: Option<PathBuf>,
) -> Result<()> {
    let file_config = ConfigLoader::load(config_path.as_ref()).context("loading configuration")?;
    let workflow_config = file_config.workflow_config()?;

    let raw_input = std::fs::read_to_string(&scenario_path)
        .with_context(|| format!("reading scenario {}", scenario_path.display()))?;

    let run_id = run_id.unwrap_or_else(generated_run_id);

    // === Dependency injection ===
    let gateway = Arc::new(HttpContentGateway::new(&file_config.gateway)?);
    let checkpoint_dir =
        checkpoint_dir.unwrap_or_else(|| file_config.workflow.checkpoint_dir.clone());
    let checkpoints: Arc<dyn CheckpointStore> = Arc::new(JsonCheckpointStore::new(checkpoint_dir)?);
    let notifier: Arc<dyn PlanNotifier> = if file_config.notifier.enabled {
        Arc::new(PushoverNotifier::new(&file_config.notifier))
    } else {
        Arc::new(DisabledNotifier)
    };
    let transitions = transition_sink(&file_config, trace_file);

    let workflow = RunWorkflowUseCase::new(
        gateway,
        checkpoints,
        notifier,
        transitions,
        workflow_config,
    )?;

    // Ctrl-C aborts at the next checkpoint boundary.
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, aborting at the next checkpoint");
            signal_token.cancel();
        }
    });

    let state = if resume {
        workflow.resume(&run_id, &cancel).await?
    } else {
        workflow.run(&run_id, &raw_input, &cancel).await?
    };

    report(&state);

    match &state.status {
        WorkflowStatus::Approved => Ok(()),
        WorkflowStatus::Failed { reason } => bail!("run {} failed: {}", state.run_id, reason),
        WorkflowStatus::Aborted => bail!("run {} aborted", state.run_id),
        WorkflowStatus::Running => bail!("run {} ended while still running", state.run_id),
    }
}

fn transition_sink(config: &FileConfig, override_path: Option<PathBuf>) -> Arc<dyn TransitionSink> {
    let path = override_path.or_else(|| config.trace.transitions_file.clone());
    match path.and_then(JsonlTransitionSink::open) {
        Some(sink) => Arc::new(sink),
        None => Arc::new(NoTransitionSink),
    }
}

fn generated_run_id() -> String {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("run-{}", seconds)
}

fn report(state: &council_domain::WorkflowState) {
    println!();
    println!("Run:        {}", state.run_id);
    println!("Iterations: {}", state.iteration);

    match &state.status {
        WorkflowStatus::Approved => {
            if let Some(consensus) = state.latest_consensus() {
                println!("Verdicts:   {}", consensus.verdict_summary());
            }
            println!("Status:     APPROVED");
            println!();
            if let Some(draft) = &state.current_draft {
                println!("=== Evacuation plan (revision {}) ===", draft.revision);
                println!("{}", draft.content);
            }
        }
        WorkflowStatus::Failed { reason } => {
            println!("Status:     FAILED");
            println!("Reason:     {}", reason);
            println!("Revisions:  {}", state.revision_history.len());
        }
        WorkflowStatus::Aborted => {
            println!("Status:     ABORTED at {}", state.stage);
        }
        WorkflowStatus::Running => {
            println!("Status:     RUNNING (stage {})", state.stage);
        }
    }

    for warning in &state.warnings {
        println!("WARNING: no safe route for {}: {}", warning.asset_id, warning.reason);
    }
}
