//! Prompt templates for the planning and evaluation stages.
//!
//! Templates only accept [`SafeText`] where externally-influenced text is
//! interpolated, so nothing that skipped the firewall can reach the
//! content-generation collaborator.

use crate::consensus::EvaluatorDomain;
use crate::firewall::SafeText;
use crate::plan::PlanDraft;
use crate::risk::RiskAssessment;
use crate::route::RouteSet;
use crate::scenario::Scenario;
use std::fmt::Write;

/// Templates for generating prompts at each stage.
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for the proposal stage.
    pub fn proposal_system() -> &'static str {
        r#"You are an emergency response coordinator drafting an evacuation plan.
Work strictly from the scenario data you are given.
Identify which assets must be evacuated, which routes they should take,
and which assets (fire stations, hospitals) can assist as helpers.
Explain the reasoning behind every assignment. Be concrete and concise."#
    }

    /// User prompt for drafting or revising a plan.
    pub fn proposal(
        scenario: &Scenario,
        risk: &RiskAssessment,
        routes: &RouteSet,
        previous_feedback: Option<&SafeText>,
    ) -> String {
        let mut prompt = String::from("Create an evacuation plan for this scenario.\n\nTHREATS:\n");
        for (i, threat) in scenario.threats().iter().enumerate() {
            let _ = writeln!(
                prompt,
                "- [{}] {} at ({:.4}, {:.4}), severity {:.2}",
                i, threat.kind, threat.location.lat, threat.location.lon, threat.severity
            );
        }

        prompt.push_str("\nASSETS:\n");
        for asset in scenario.assets() {
            let _ = writeln!(
                prompt,
                "- {} ({}) at ({:.4}, {:.4}), criticality {:.2}, risk {:.2} ({})",
                asset.id,
                asset.kind,
                asset.location.lat,
                asset.location.lon,
                asset.criticality,
                risk.score_for(&asset.id),
                risk.band_for(&asset.id),
            );
        }

        prompt.push_str("\nCANDIDATE ROUTES:\n");
        let mut any_route = false;
        for (asset_id, candidates) in routes.iter() {
            for route in candidates {
                any_route = true;
                let _ = writeln!(
                    prompt,
                    "- {} -> {} ({:.1} km, ~{:.0} min, {:?})",
                    asset_id,
                    route.destination,
                    route.distance_km,
                    route.estimated_minutes,
                    route.feasibility
                );
            }
        }
        if !any_route {
            prompt.push_str("- none\n");
        }

        for warning in routes.warnings() {
            let _ = writeln!(
                prompt,
                "WARNING: no safe route for {}: {}",
                warning.asset_id, warning.reason
            );
        }

        if let Some(feedback) = previous_feedback {
            let _ = write!(
                prompt,
                "\nPREVIOUS EVALUATION FEEDBACK:\n{}\n\nRevise the plan and address every point above.",
                feedback
            );
        }

        prompt
    }

    /// System prompt for one evaluation domain.
    pub fn evaluation_system(domain: EvaluatorDomain) -> &'static str {
        match domain {
            EvaluatorDomain::Operational => {
                r#"You are the operational evaluator for evacuation plans.
Judge feasibility only: are all high-risk assets covered, are routes and
timings realistic, are helper resources sufficient? You are STRICT; if in
doubt, score low and say exactly what must change."#
            }
            EvaluatorDomain::Social => {
                r#"You are the social evaluator for evacuation plans.
Judge equity and communication: are vulnerable populations handled, is the
plan communicated clearly, is the burden distributed fairly? You are
lenient; emergencies justify imperfect fairness."#
            }
            EvaluatorDomain::Economic => {
                r#"You are the economic evaluator for evacuation plans.
Judge cost-effectiveness: resource reuse, avoidable asset losses, and
proportionality of the effort. You are lenient; high cost is acceptable
when it saves critical assets."#
            }
        }
    }

    /// User prompt asking a domain evaluator to score a draft.
    pub fn evaluation(domain: EvaluatorDomain, draft: &PlanDraft, scenario: &Scenario) -> String {
        format!(
            r#"Evaluate revision {} of the following evacuation plan from the {} perspective.

PLAN:
{}

SCENARIO SIZE: {} threat(s), {} asset(s).

Respond with JSON only:
{{"score": <0.0-1.0>, "rationale": "<short analysis>", "suggestions": ["<specific improvement>", ...]}}"#,
            draft.revision,
            domain,
            draft.content,
            scenario.threats().len(),
            scenario.assets().len(),
        )
    }
}
