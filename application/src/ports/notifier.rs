//! Plan notifier port.
//!
//! The orchestrator hands an approved plan to this collaborator
//! fire-and-forget: delivery failure is logged and surfaced separately,
//! it never invalidates the Approved outcome. Retry semantics are the
//! transport's concern, not specified here.

use async_trait::async_trait;
use council_domain::{PlanDraft, Scenario};
use thiserror::Error;

/// Delivery failure. Logged, never fatal.
#[derive(Error, Debug)]
#[error("Notification delivery failed for run {run_id}: {message}")]
pub struct NotifyError {
    pub run_id: String,
    pub message: String,
}

/// Push-notification transport for approved plans.
#[async_trait]
pub trait PlanNotifier: Send + Sync {
    async fn notify(
        &self,
        run_id: &str,
        draft: &PlanDraft,
        scenario: &Scenario,
    ) -> Result<(), NotifyError>;
}
