//! Workflow configuration.
//!
//! An immutable configuration value constructed once at startup and
//! passed by reference through the orchestrator and every stage. There
//! is no ambient global lookup.

use council_domain::{CompensationRule, EvaluatorDomain};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while validating a [`WorkflowConfig`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{domain} threshold {value} out of valid range [0, 1]")]
    ThresholdOutOfRange { domain: EvaluatorDomain, value: f64 },

    #[error("max_iterations must be at least 1")]
    ZeroIterations,

    #[error("evaluator_timeout must be non-zero")]
    ZeroTimeout,
}

/// Tunables for one planning run.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowConfig {
    /// Strict approval threshold for the operational evaluator.
    pub operational_threshold: f64,
    /// Lenient approval threshold for the social evaluator.
    pub social_threshold: f64,
    /// Lenient approval threshold for the economic evaluator.
    pub economic_threshold: f64,
    /// How the soft evaluators may compensate for each other.
    pub compensation: CompensationRule,
    /// Maximum proposal cycles before the run fails. At least 1.
    pub max_iterations: u32,
    /// Budget for a single evaluator call; timeouts become synthetic
    /// failing verdicts.
    pub evaluator_timeout: Duration,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            operational_threshold: EvaluatorDomain::Operational.default_threshold(),
            social_threshold: EvaluatorDomain::Social.default_threshold(),
            economic_threshold: EvaluatorDomain::Economic.default_threshold(),
            compensation: CompensationRule::default(),
            max_iterations: 4,
            evaluator_timeout: Duration::from_secs(60),
        }
    }
}

impl WorkflowConfig {
    pub fn threshold_for(&self, domain: EvaluatorDomain) -> f64 {
        match domain {
            EvaluatorDomain::Operational => self.operational_threshold,
            EvaluatorDomain::Social => self.social_threshold,
            EvaluatorDomain::Economic => self.economic_threshold,
        }
    }

    /// Validate ranges. Called once at startup before any run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for domain in EvaluatorDomain::ALL {
            let value = self.threshold_for(domain);
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { domain, value });
            }
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.evaluator_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(WorkflowConfig::default().validate().is_ok());
    }

    #[test]
    fn default_thresholds_match_domain_defaults() {
        let config = WorkflowConfig::default();
        assert_eq!(config.operational_threshold, 0.6);
        assert_eq!(config.social_threshold, 0.5);
        assert_eq!(config.economic_threshold, 0.5);
    }

    #[test]
    fn rejects_zero_iterations() {
        let config = WorkflowConfig {
            max_iterations: 0,
            ..WorkflowConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroIterations));
    }

    #[test]
    fn rejects_threshold_out_of_range() {
        let config = WorkflowConfig {
            operational_threshold: 1.2,
            ..WorkflowConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ThresholdOutOfRange {
                domain: EvaluatorDomain::Operational,
                ..
            })
        ));
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = WorkflowConfig {
            evaluator_timeout: Duration::ZERO,
            ..WorkflowConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }
}
