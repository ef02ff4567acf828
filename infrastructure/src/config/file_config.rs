//! Raw TOML configuration data types.
//!
//! These structs represent the exact structure of the config file.
//! Unknown keys are a configuration error, not a silent no-op.

use council_application::WorkflowConfig;
use council_domain::CompensationRule;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::ConfigLoadError;

/// Complete file configuration (raw TOML structure).
///
/// # Example
///
/// ```toml
/// [evaluators]
/// operational_threshold = 0.6
/// social_threshold = 0.5
/// economic_threshold = 0.5
///
/// [workflow]
/// max_iterations = 4
/// evaluator_timeout_secs = 60
/// checkpoint_dir = "checkpoints"
///
/// [consensus]
/// rule = "weighted_average:0.5"
///
/// [gateway]
/// endpoint = "http://127.0.0.1:8080/v1/generate"
/// model = "planner-large"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Per-domain approval thresholds.
    pub evaluators: FileEvaluatorsConfig,
    /// Orchestrator settings.
    pub workflow: FileWorkflowConfig,
    /// Soft-evaluator compensation rule.
    pub consensus: FileConsensusConfig,
    /// Content-generation endpoint.
    pub gateway: FileGatewayConfig,
    /// Pushover delivery for approved plans.
    pub notifier: FileNotifierConfig,
    /// Transition trace output.
    pub trace: FileTraceConfig,
}

impl FileConfig {
    /// Convert the file representation into a validated [`WorkflowConfig`].
    pub fn workflow_config(&self) -> Result<WorkflowConfig, ConfigLoadError> {
        let compensation: CompensationRule = self
            .consensus
            .rule
            .parse()
            .map_err(ConfigLoadError::InvalidRule)?;
        let config = WorkflowConfig {
            operational_threshold: self.evaluators.operational_threshold,
            social_threshold: self.evaluators.social_threshold,
            economic_threshold: self.evaluators.economic_threshold,
            compensation,
            max_iterations: self.workflow.max_iterations,
            evaluator_timeout: Duration::from_secs(self.workflow.evaluator_timeout_secs),
        };
        config.validate()?;
        Ok(config)
    }
}

/// `[evaluators]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileEvaluatorsConfig {
    pub operational_threshold: f64,
    pub social_threshold: f64,
    pub economic_threshold: f64,
}

impl Default for FileEvaluatorsConfig {
    fn default() -> Self {
        let defaults = WorkflowConfig::default();
        Self {
            operational_threshold: defaults.operational_threshold,
            social_threshold: defaults.social_threshold,
            economic_threshold: defaults.economic_threshold,
        }
    }
}

/// `[workflow]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileWorkflowConfig {
    /// Maximum proposal cycles before the run fails.
    pub max_iterations: u32,
    /// Budget for a single evaluator call, in seconds.
    pub evaluator_timeout_secs: u64,
    /// Directory for per-run checkpoint files.
    pub checkpoint_dir: PathBuf,
}

impl Default for FileWorkflowConfig {
    fn default() -> Self {
        let defaults = WorkflowConfig::default();
        Self {
            max_iterations: defaults.max_iterations,
            evaluator_timeout_secs: defaults.evaluator_timeout.as_secs(),
            checkpoint_dir: PathBuf::from("checkpoints"),
        }
    }
}

/// `[consensus]` section.
///
/// The rule string is either `either_passes` or `weighted_average:B`
/// with the bar B in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConsensusConfig {
    pub rule: String,
}

impl Default for FileConsensusConfig {
    fn default() -> Self {
        Self {
            rule: "weighted_average:0.5".to_string(),
        }
    }
}

/// `[gateway]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileGatewayConfig {
    /// Generation endpoint, POSTed to with a JSON body.
    pub endpoint: String,
    /// Optional model identifier forwarded in the request body.
    pub model: Option<String>,
    /// Environment variable holding the bearer token, read at startup.
    pub api_key_env: Option<String>,
    /// Whole-request timeout, in seconds.
    pub timeout_secs: u64,
}

impl Default for FileGatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080/v1/generate".to_string(),
            model: None,
            api_key_env: None,
            timeout_secs: 120,
        }
    }
}

/// `[notifier]` section (Pushover).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileNotifierConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub token: String,
    pub user: String,
    /// Pushover priority, -2 (silent) to 2 (emergency).
    pub priority: i8,
    pub sound: Option<String>,
}

impl Default for FileNotifierConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "https://api.pushover.net/1/messages.json".to_string(),
            token: String::new(),
            user: String::new(),
            priority: 1,
            sound: None,
        }
    }
}

/// `[trace]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileTraceConfig {
    /// JSONL file receiving one line per state transition. Disabled
    /// when unset.
    pub transitions_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_produce_a_valid_workflow_config() {
        let config = FileConfig::default().workflow_config().unwrap();
        assert_eq!(config, WorkflowConfig::default());
    }

    #[test]
    fn deserializes_partial_toml_over_defaults() {
        let toml_str = r#"
[evaluators]
operational_threshold = 0.7

[workflow]
max_iterations = 2

[consensus]
rule = "either_passes"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.evaluators.operational_threshold, 0.7);
        assert_eq!(config.evaluators.social_threshold, 0.5);
        assert_eq!(config.workflow.max_iterations, 2);

        let workflow = config.workflow_config().unwrap();
        assert_eq!(workflow.compensation, CompensationRule::EitherPasses);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let toml_str = r#"
[workflow]
max_iteratons = 2
"#;
        assert!(toml::from_str::<FileConfig>(toml_str).is_err());
    }

    #[test]
    fn bad_rule_string_is_a_load_error() {
        let config = FileConfig {
            consensus: FileConsensusConfig {
                rule: "weighted_average:1.5".to_string(),
            },
            ..FileConfig::default()
        };
        assert!(matches!(
            config.workflow_config(),
            Err(ConfigLoadError::InvalidRule(_))
        ));
    }

    #[test]
    fn out_of_range_threshold_is_a_load_error() {
        let config = FileConfig {
            evaluators: FileEvaluatorsConfig {
                operational_threshold: 1.4,
                ..FileEvaluatorsConfig::default()
            },
            ..FileConfig::default()
        };
        assert!(matches!(
            config.workflow_config(),
            Err(ConfigLoadError::Invalid(_))
        ));
    }
}
