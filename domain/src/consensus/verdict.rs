//! Evaluator domains and their verdicts.

use serde::{Deserialize, Serialize};

/// The three evaluation domains, in priority order.
///
/// Operational carries an absolute veto; Social and Economic are soft
/// and may compensate for each other under the configured
/// [`CompensationRule`](super::CompensationRule), but never for
/// Operational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluatorDomain {
    /// Feasibility, timing, resource sufficiency. Strict.
    Operational,
    /// Equity, communication clarity, vulnerable-population handling. Lenient.
    Social,
    /// Cost, resource reuse, asset-loss minimization. Lenient.
    Economic,
}

impl EvaluatorDomain {
    pub const ALL: [EvaluatorDomain; 3] = [
        EvaluatorDomain::Operational,
        EvaluatorDomain::Social,
        EvaluatorDomain::Economic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluatorDomain::Operational => "operational",
            EvaluatorDomain::Social => "social",
            EvaluatorDomain::Economic => "economic",
        }
    }

    /// Ordering used when aggregating feedback: Operational first.
    pub fn priority(&self) -> u8 {
        match self {
            EvaluatorDomain::Operational => 0,
            EvaluatorDomain::Social => 1,
            EvaluatorDomain::Economic => 2,
        }
    }

    /// Default approval threshold for this domain.
    pub fn default_threshold(&self) -> f64 {
        match self {
            EvaluatorDomain::Operational => 0.6,
            EvaluatorDomain::Social => 0.5,
            EvaluatorDomain::Economic => 0.5,
        }
    }
}

impl std::fmt::Display for EvaluatorDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One evaluator's verdict on one plan draft. Immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationVerdict {
    pub domain: EvaluatorDomain,
    /// Score in [0, 1].
    pub score: f64,
    /// `score >= threshold` at evaluation time.
    pub passed: bool,
    pub rationale: String,
    pub improvement_suggestions: Vec<String>,
}

impl EvaluationVerdict {
    /// Build a verdict from a score and the threshold in effect.
    pub fn new(
        domain: EvaluatorDomain,
        score: f64,
        threshold: f64,
        rationale: impl Into<String>,
        improvement_suggestions: Vec<String>,
    ) -> Self {
        let score = score.clamp(0.0, 1.0);
        Self {
            domain,
            score,
            passed: score >= threshold,
            rationale: rationale.into(),
            improvement_suggestions,
        }
    }

    /// Synthetic failing verdict, used when an evaluator call times out
    /// or errors so synthesis never blocks on a missing verdict.
    pub fn failing(domain: EvaluatorDomain, rationale: impl Into<String>) -> Self {
        Self {
            domain,
            score: 0.0,
            passed: false,
            rationale: rationale.into(),
            improvement_suggestions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passed_derived_from_threshold() {
        let v = EvaluationVerdict::new(EvaluatorDomain::Operational, 0.65, 0.6, "ok", vec![]);
        assert!(v.passed);

        let v = EvaluationVerdict::new(EvaluatorDomain::Operational, 0.55, 0.6, "short", vec![]);
        assert!(!v.passed);

        // boundary is inclusive
        let v = EvaluationVerdict::new(EvaluatorDomain::Social, 0.5, 0.5, "edge", vec![]);
        assert!(v.passed);
    }

    #[test]
    fn score_clamped_to_unit_interval() {
        let v = EvaluationVerdict::new(EvaluatorDomain::Economic, 1.7, 0.5, "", vec![]);
        assert_eq!(v.score, 1.0);
    }

    #[test]
    fn synthetic_failure_never_passes() {
        let v = EvaluationVerdict::failing(EvaluatorDomain::Social, "evaluation timed out");
        assert!(!v.passed);
        assert_eq!(v.score, 0.0);
        assert_eq!(v.rationale, "evaluation timed out");
    }

    #[test]
    fn priority_order() {
        let mut domains = EvaluatorDomain::ALL;
        domains.sort_by_key(|d| d.priority());
        assert_eq!(domains[0], EvaluatorDomain::Operational);
    }
}
