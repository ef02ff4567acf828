//! Verdict synthesis: three independent verdicts in, one decision out.

use super::policy::CompensationRule;
use super::verdict::{EvaluationVerdict, EvaluatorDomain};
use serde::{Deserialize, Serialize};

/// The consensus decision for one plan draft.
///
/// Produced once per draft; retains the verdicts it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// The three verdicts, ordered by evaluator priority.
    pub verdicts: Vec<EvaluationVerdict>,
    pub approved: bool,
    /// Improvement suggestions from every failing evaluator,
    /// deduplicated, Operational's first.
    pub aggregated_feedback: Vec<String>,
}

impl ConsensusResult {
    pub fn verdict(&self, domain: EvaluatorDomain) -> Option<&EvaluationVerdict> {
        self.verdicts.iter().find(|v| v.domain == domain)
    }

    /// Visual summary of the votes, Operational first (e.g. "[●○●]").
    pub fn verdict_summary(&self) -> String {
        let mut summary = String::from("[");
        for verdict in &self.verdicts {
            summary.push(if verdict.passed { '●' } else { '○' });
        }
        summary.push(']');
        summary
    }
}

/// Combine the three verdicts into a single approve/retry decision.
///
/// Decision rule:
///
/// ```text
/// approved = operational.passed
///         && (social.passed   || rule.is_met(social, economic))
///         && (economic.passed || rule.is_met(social, economic))
/// ```
///
/// Operational failing always forces a retry regardless of the other
/// two; the soft evaluators may compensate for each other per the
/// configured rule but never for Operational.
pub fn synthesize(
    operational: EvaluationVerdict,
    social: EvaluationVerdict,
    economic: EvaluationVerdict,
    rule: &CompensationRule,
) -> ConsensusResult {
    debug_assert_eq!(operational.domain, EvaluatorDomain::Operational);
    debug_assert_eq!(social.domain, EvaluatorDomain::Social);
    debug_assert_eq!(economic.domain, EvaluatorDomain::Economic);

    let compensated = rule.is_met(&social, &economic);
    let approved = operational.passed
        && (social.passed || compensated)
        && (economic.passed || compensated);

    let verdicts = vec![operational, social, economic];

    let mut aggregated_feedback = Vec::new();
    for verdict in verdicts.iter().filter(|v| !v.passed) {
        for suggestion in &verdict.improvement_suggestions {
            if !aggregated_feedback.contains(suggestion) {
                aggregated_feedback.push(suggestion.clone());
            }
        }
    }

    ConsensusResult {
        verdicts,
        approved,
        aggregated_feedback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(domain: EvaluatorDomain, score: f64) -> EvaluationVerdict {
        EvaluationVerdict::new(domain, score, domain.default_threshold(), "", vec![])
    }

    fn verdict_with(
        domain: EvaluatorDomain,
        score: f64,
        suggestions: &[&str],
    ) -> EvaluationVerdict {
        EvaluationVerdict::new(
            domain,
            score,
            domain.default_threshold(),
            "",
            suggestions.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn all_passing_approves() {
        let result = synthesize(
            verdict(EvaluatorDomain::Operational, 0.8),
            verdict(EvaluatorDomain::Social, 0.7),
            verdict(EvaluatorDomain::Economic, 0.6),
            &CompensationRule::default(),
        );
        assert!(result.approved);
        assert!(result.aggregated_feedback.is_empty());
        assert_eq!(result.verdict_summary(), "[●●●]");
    }

    #[test]
    fn operational_veto_is_absolute() {
        // Perfect soft scores can never compensate a failing Operational
        for rule in [
            CompensationRule::EitherPasses,
            CompensationRule::WeightedAverage { bar: 0.0 },
        ] {
            let result = synthesize(
                verdict(EvaluatorDomain::Operational, 0.59),
                verdict(EvaluatorDomain::Social, 1.0),
                verdict(EvaluatorDomain::Economic, 1.0),
                &rule,
            );
            assert!(!result.approved, "veto bypassed under {:?}", rule);
        }
    }

    #[test]
    fn soft_compensation_may_approve() {
        // Social fails its own threshold (0.45 < 0.5) but the mean with
        // Economic reaches the bar
        let result = synthesize(
            verdict(EvaluatorDomain::Operational, 0.7),
            verdict(EvaluatorDomain::Social, 0.45),
            verdict(EvaluatorDomain::Economic, 0.55),
            &CompensationRule::WeightedAverage { bar: 0.5 },
        );
        assert!(result.approved);
    }

    #[test]
    fn compensation_boundary_table() {
        // (operational, social, economic, rule, expected)
        let cases: &[(f64, f64, f64, CompensationRule, bool)] = &[
            // exact thresholds everywhere
            (0.6, 0.5, 0.5, CompensationRule::WeightedAverage { bar: 0.5 }, true),
            // both soft below threshold, mean at bar
            (0.7, 0.45, 0.55, CompensationRule::WeightedAverage { bar: 0.5 }, true),
            // mean just below bar
            (0.7, 0.44, 0.55, CompensationRule::WeightedAverage { bar: 0.5 }, false),
            // both soft failing, no compensation possible
            (0.9, 0.2, 0.3, CompensationRule::WeightedAverage { bar: 0.5 }, false),
            // either_passes: one passing soft carries the other
            (0.7, 0.1, 0.6, CompensationRule::EitherPasses, true),
            // either_passes: both failing
            (0.7, 0.49, 0.49, CompensationRule::EitherPasses, false),
            // operational exactly below its threshold
            (0.59, 0.9, 0.9, CompensationRule::EitherPasses, false),
        ];

        for &(op, social, economic, rule, expected) in cases {
            let result = synthesize(
                verdict(EvaluatorDomain::Operational, op),
                verdict(EvaluatorDomain::Social, social),
                verdict(EvaluatorDomain::Economic, economic),
                &rule,
            );
            assert_eq!(
                result.approved, expected,
                "op={} social={} economic={} rule={:?}",
                op, social, economic, rule
            );
        }
    }

    #[test]
    fn feedback_ordered_by_priority_and_deduplicated() {
        let result = synthesize(
            verdict_with(
                EvaluatorDomain::Operational,
                0.3,
                &["add staging for dc-east", "shared fix"],
            ),
            verdict_with(EvaluatorDomain::Social, 0.2, &["notify residents", "shared fix"]),
            verdict_with(EvaluatorDomain::Economic, 0.9, &["unused: evaluator passed"]),
            &CompensationRule::default(),
        );

        assert!(!result.approved);
        assert_eq!(
            result.aggregated_feedback,
            vec![
                "add staging for dc-east".to_string(),
                "shared fix".to_string(),
                "notify residents".to_string(),
            ]
        );
    }

    #[test]
    fn passing_evaluator_contributes_no_feedback() {
        let result = synthesize(
            verdict_with(EvaluatorDomain::Operational, 0.9, &["polish timings"]),
            verdict(EvaluatorDomain::Social, 0.9),
            verdict(EvaluatorDomain::Economic, 0.9),
            &CompensationRule::default(),
        );
        assert!(result.approved);
        assert!(result.aggregated_feedback.is_empty());
    }
}
