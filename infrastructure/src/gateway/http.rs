//! HTTP adapter for the content-generation collaborator.
//!
//! POSTs a JSON body `{model?, system, prompt}` to the configured
//! endpoint and expects `{"text": "..."}` back. Transport and status
//! failures map onto [`GatewayError`] variants; the whole-request
//! timeout lives in the client so a hung endpoint cannot stall a run
//! past the evaluator budget.

use crate::config::FileGatewayConfig;
use async_trait::async_trait;
use council_application::{ContentGateway, GatewayError};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Gateway speaking a minimal JSON generation protocol.
pub struct HttpContentGateway {
    client: reqwest::Client,
    endpoint: String,
    model: Option<String>,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    text: String,
}

impl HttpContentGateway {
    pub fn new(config: &FileGatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        let api_key = config
            .api_key_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok());

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
        })
    }

    fn body(&self, system_prompt: &str, prompt: &str) -> serde_json::Value {
        let mut body = json!({
            "system": system_prompt,
            "prompt": prompt,
        });
        if let Some(model) = &self.model {
            body["model"] = json!(model);
        }
        body
    }
}

#[async_trait]
impl ContentGateway for HttpContentGateway {
    async fn generate(&self, system_prompt: &str, prompt: &str) -> Result<String, GatewayError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&self.body(system_prompt, prompt));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else if e.is_connect() {
                GatewayError::ConnectionError(e.to_string())
            } else {
                GatewayError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::RequestFailed(format!(
                "HTTP {} from {}",
                status.as_u16(),
                self.endpoint
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::RequestFailed(format!("malformed response: {}", e)))?;
        debug!(chars = parsed.text.len(), "generation received");
        Ok(parsed.text)
    }
}
