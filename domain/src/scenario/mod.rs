//! Scenario model: threats, assets, and structural parsing.
//!
//! A [`Scenario`] is produced exactly once from sanitized input and is
//! read-only afterwards. Every downstream stage (risk analysis, route
//! planning, proposal, evaluation) borrows it.

mod entities;
mod parse;

pub use entities::{Asset, AssetId, AssetKind, Location, Scenario, Threat, ThreatKind};
pub use parse::{ScenarioError, SchemaViolation};
