//! Pushover delivery for approved evacuation plans.

use crate::config::FileNotifierConfig;
use async_trait::async_trait;
use council_application::{NotifyError, PlanNotifier};
use council_domain::{PlanDraft, Scenario};
use serde::Serialize;
use tracing::info;

/// Pushover message body limit.
const MAX_MESSAGE_CHARS: usize = 1024;

/// Notifier posting approved plans to the Pushover message API.
pub struct PushoverNotifier {
    client: reqwest::Client,
    endpoint: String,
    token: String,
    user: String,
    priority: i8,
    sound: Option<String>,
}

#[derive(Serialize)]
struct PushoverMessage<'a> {
    token: &'a str,
    user: &'a str,
    title: String,
    message: String,
    priority: i8,
    #[serde(skip_serializing_if = "Option::is_none")]
    sound: Option<&'a str>,
}

impl PushoverNotifier {
    pub fn new(config: &FileNotifierConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
            user: config.user.clone(),
            priority: config.priority,
            sound: config.sound.clone(),
        }
    }
}

/// Truncate on a char boundary, marking the cut.
fn truncated(content: &str, limit: usize) -> String {
    if content.chars().count() <= limit {
        return content.to_string();
    }
    let cut: String = content.chars().take(limit - 1).collect();
    format!("{}…", cut)
}

#[async_trait]
impl PlanNotifier for PushoverNotifier {
    async fn notify(
        &self,
        run_id: &str,
        draft: &PlanDraft,
        scenario: &Scenario,
    ) -> Result<(), NotifyError> {
        let message = PushoverMessage {
            token: &self.token,
            user: &self.user,
            title: format!(
                "Evacuation plan approved ({} threat(s), revision {})",
                scenario.threats().len(),
                draft.revision
            ),
            message: truncated(&draft.content, MAX_MESSAGE_CHARS),
            priority: self.priority,
            sound: self.sound.as_deref(),
        };

        let failed = |message: String| NotifyError {
            run_id: run_id.to_string(),
            message,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .form(&message)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("Pushover returned HTTP {}", status.as_u16())));
        }
        info!(run_id, "push notification delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_passes_through() {
        assert_eq!(truncated("evacuate dc-east", 1024), "evacuate dc-east");
    }

    #[test]
    fn long_content_is_cut_within_the_limit() {
        let long = "x".repeat(5000);
        let cut = truncated(&long, MAX_MESSAGE_CHARS);
        assert_eq!(cut.chars().count(), MAX_MESSAGE_CHARS);
        assert!(cut.ends_with('…'));
    }
}
