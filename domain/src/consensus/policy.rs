//! Compensation policy between the soft evaluators.
//!
//! The exact rule by which Social and Economic may compensate for each
//! other is configuration, not a hardcoded assumption. Operational is
//! never part of compensation.

use super::verdict::EvaluationVerdict;
use serde::{Deserialize, Serialize};

/// Rule deciding whether a failing soft verdict is compensated by the
/// other soft verdict.
///
/// # Example
///
/// ```
/// use council_domain::consensus::{CompensationRule, EvaluationVerdict, EvaluatorDomain};
///
/// let rule = CompensationRule::WeightedAverage { bar: 0.5 };
/// let social = EvaluationVerdict::new(EvaluatorDomain::Social, 0.45, 0.5, "", vec![]);
/// let economic = EvaluationVerdict::new(EvaluatorDomain::Economic, 0.55, 0.5, "", vec![]);
/// assert!(rule.is_met(&social, &economic));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompensationRule {
    /// Compensation holds if at least one of the two soft verdicts
    /// passed on its own threshold.
    EitherPasses,
    /// Compensation holds if the mean of the two soft scores reaches
    /// the configured bar.
    WeightedAverage { bar: f64 },
}

impl Default for CompensationRule {
    fn default() -> Self {
        CompensationRule::WeightedAverage { bar: 0.5 }
    }
}

impl CompensationRule {
    /// Whether the Social/Economic pair satisfies the compensating bar.
    pub fn is_met(&self, social: &EvaluationVerdict, economic: &EvaluationVerdict) -> bool {
        match self {
            CompensationRule::EitherPasses => social.passed || economic.passed,
            CompensationRule::WeightedAverage { bar } => {
                (social.score + economic.score) / 2.0 >= *bar
            }
        }
    }

    pub fn description(&self) -> String {
        match self {
            CompensationRule::EitherPasses => "either soft evaluator passes".to_string(),
            CompensationRule::WeightedAverage { bar } => {
                format!("mean soft score of at least {:.2}", bar)
            }
        }
    }
}

impl std::fmt::Display for CompensationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for CompensationRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "either_passes" | "either" => Ok(CompensationRule::EitherPasses),
            s if s.starts_with("weighted_average:") || s.starts_with("average:") => {
                let bar: f64 = s
                    .split(':')
                    .nth(1)
                    .ok_or("Missing bar after weighted_average:")?
                    .parse()
                    .map_err(|_| "Invalid bar for weighted_average")?;
                if !(0.0..=1.0).contains(&bar) {
                    return Err(format!("Compensation bar {} out of range [0, 1]", bar));
                }
                Ok(CompensationRule::WeightedAverage { bar })
            }
            _ => Err(format!(
                "Unknown compensation rule: {}. Valid: either_passes, weighted_average:B",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::EvaluatorDomain;

    fn soft(domain: EvaluatorDomain, score: f64) -> EvaluationVerdict {
        EvaluationVerdict::new(domain, score, domain.default_threshold(), "", vec![])
    }

    #[test]
    fn either_passes() {
        let rule = CompensationRule::EitherPasses;
        assert!(rule.is_met(
            &soft(EvaluatorDomain::Social, 0.3),
            &soft(EvaluatorDomain::Economic, 0.6)
        ));
        assert!(!rule.is_met(
            &soft(EvaluatorDomain::Social, 0.3),
            &soft(EvaluatorDomain::Economic, 0.4)
        ));
    }

    #[test]
    fn weighted_average_boundary() {
        let rule = CompensationRule::WeightedAverage { bar: 0.5 };
        // 0.45 + 0.55 averages exactly to the bar
        assert!(rule.is_met(
            &soft(EvaluatorDomain::Social, 0.45),
            &soft(EvaluatorDomain::Economic, 0.55)
        ));
        assert!(!rule.is_met(
            &soft(EvaluatorDomain::Social, 0.44),
            &soft(EvaluatorDomain::Economic, 0.55)
        ));
    }

    #[test]
    fn parse_rules() {
        assert_eq!(
            "either_passes".parse::<CompensationRule>().ok(),
            Some(CompensationRule::EitherPasses)
        );
        assert_eq!(
            "weighted_average:0.55".parse::<CompensationRule>().ok(),
            Some(CompensationRule::WeightedAverage { bar: 0.55 })
        );
        assert!("weighted_average:1.5".parse::<CompensationRule>().is_err());
        assert!("plurality".parse::<CompensationRule>().is_err());
    }

    #[test]
    fn default_rule() {
        assert_eq!(
            CompensationRule::default(),
            CompensationRule::WeightedAverage { bar: 0.5 }
        );
    }
}
