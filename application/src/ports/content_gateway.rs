//! Content generation gateway port.
//!
//! Defines the interface to the external content-generation collaborator
//! that drafts plan text and produces evaluation rationale. Treated as a
//! black box with no guaranteed determinism; implementations (adapters)
//! live in the infrastructure layer.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during content generation.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway to the content-generation collaborator.
#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// Generate text for the given system and user prompt.
    async fn generate(&self, system_prompt: &str, prompt: &str) -> Result<String, GatewayError>;
}
