//! Use cases orchestrating the domain layer through the ports.

mod evaluate_plan;
mod propose_plan;
mod run_workflow;

pub use run_workflow::{RunWorkflowUseCase, WorkflowError};
