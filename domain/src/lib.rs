//! Domain layer for evac-council.
//!
//! This crate contains the core business logic, entities, and value
//! objects. It has no dependencies on infrastructure or presentation
//! concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Consensus gate
//!
//! Three independent evaluators (operational, social, economic) score a
//! proposed evacuation plan in parallel. Their verdicts are synthesized
//! into a single approve/retry decision: Operational holds an absolute
//! veto, while the soft evaluators may compensate for each other under a
//! configured [`consensus::CompensationRule`].
//!
//! ## Firewall
//!
//! Externally-sourced text must pass [`firewall::sanitize`] before it
//! can reach the parser or a prompt. The [`firewall::SafeText`] type
//! makes this unavoidable at compile time.

pub mod consensus;
pub mod firewall;
pub mod geo;
pub mod plan;
pub mod prompt;
pub mod risk;
pub mod route;
pub mod scenario;
pub mod workflow;

// Re-export commonly used types
pub use consensus::{
    CompensationRule, ConsensusResult, EvaluationVerdict, EvaluatorDomain, ParsedVerdict,
    parse_verdict_response, synthesize,
};
pub use firewall::{InjectionDetected, OffendingSpan, SafeText, sanitize};
pub use plan::{PlanDraft, RevisionHistory};
pub use prompt::PromptTemplate;
pub use risk::{AssetRisk, RiskAssessment, RiskBand, ThreatContribution, assess};
pub use route::{CandidateRoute, NoSafeRouteWarning, RouteFeasibility, RouteSet, plan_routes};
pub use scenario::{
    Asset, AssetId, AssetKind, Location, Scenario, ScenarioError, SchemaViolation, Threat,
    ThreatKind,
};
pub use workflow::{StageOutcome, WorkflowStage, WorkflowState, WorkflowStatus, next_stage};
