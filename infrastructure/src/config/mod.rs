//! File-based configuration: raw TOML structure and the figment loader.

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileConsensusConfig, FileEvaluatorsConfig, FileGatewayConfig, FileNotifierConfig,
    FileTraceConfig, FileWorkflowConfig,
};
pub use loader::ConfigLoader;

use council_application::ConfigError;
use thiserror::Error;

/// Errors raised while loading and validating configuration.
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("Failed to read configuration: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Invalid consensus rule: {0}")]
    InvalidRule(String),

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}
