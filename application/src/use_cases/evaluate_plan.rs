//! Parallel evaluation of a plan draft by the three council domains.

use crate::config::WorkflowConfig;
use crate::ports::content_gateway::ContentGateway;
use council_domain::consensus::{EvaluationVerdict, EvaluatorDomain, parse_verdict_response};
use council_domain::{PlanDraft, PromptTemplate, Scenario};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Run all three evaluators concurrently and return their verdicts in
/// priority order (operational, social, economic).
///
/// An evaluator never blocks the run: a gateway error or a timeout
/// collapses into a failing verdict for that domain, and synthesis
/// proceeds with whatever the council produced.
pub(crate) async fn evaluate<G: ContentGateway + ?Sized + 'static>(
    gateway: &Arc<G>,
    config: &WorkflowConfig,
    draft: &PlanDraft,
    scenario: &Scenario,
) -> Vec<EvaluationVerdict> {
    let mut set = JoinSet::new();
    for domain in EvaluatorDomain::ALL {
        let gateway = Arc::clone(gateway);
        let system = PromptTemplate::evaluation_system(domain).to_string();
        let prompt = PromptTemplate::evaluation(domain, draft, scenario);
        let threshold = config.threshold_for(domain);
        let timeout = config.evaluator_timeout;

        set.spawn(async move {
            let response =
                tokio::time::timeout(timeout, gateway.generate(&system, &prompt)).await;
            let verdict = match response {
                Ok(Ok(text)) => {
                    let parsed = parse_verdict_response(&text);
                    EvaluationVerdict::new(
                        domain,
                        parsed.score,
                        threshold,
                        parsed.rationale,
                        parsed.suggestions,
                    )
                }
                Ok(Err(e)) => {
                    warn!(domain = domain.as_str(), error = %e, "evaluator failed");
                    EvaluationVerdict::failing(domain, format!("evaluation failed: {}", e))
                }
                Err(_) => {
                    warn!(domain = domain.as_str(), "evaluator timed out");
                    EvaluationVerdict::failing(domain, "evaluation timed out")
                }
            };
            debug!(
                domain = domain.as_str(),
                score = verdict.score,
                passed = verdict.passed,
                "verdict collected"
            );
            verdict
        });
    }

    let mut verdicts = Vec::with_capacity(EvaluatorDomain::ALL.len());
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(verdict) => verdicts.push(verdict),
            Err(e) => warn!(error = %e, "evaluator task panicked"),
        }
    }
    // A panicked task leaves a hole; fill it with a failing verdict so
    // synthesis always sees the full council.
    for domain in EvaluatorDomain::ALL {
        if !verdicts.iter().any(|v| v.domain == domain) {
            verdicts.push(EvaluationVerdict::failing(domain, "evaluator crashed"));
        }
    }
    verdicts.sort_by_key(|v| v.domain.priority());
    verdicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::content_gateway::GatewayError;
    use council_domain::{Scenario, sanitize};
    use std::time::Duration;

    fn scenario() -> Scenario {
        Scenario::parse(&sanitize(r#"{"threats": [], "assets": []}"#).unwrap()).unwrap()
    }

    struct FixedGateway {
        operational: String,
        social: String,
        economic: String,
    }

    #[async_trait::async_trait]
    impl ContentGateway for FixedGateway {
        async fn generate(&self, system: &str, _prompt: &str) -> Result<String, GatewayError> {
            let body = if system.contains("operational") {
                &self.operational
            } else if system.contains("social") {
                &self.social
            } else {
                &self.economic
            };
            Ok(body.clone())
        }
    }

    struct StalledGateway;

    #[async_trait::async_trait]
    impl ContentGateway for StalledGateway {
        async fn generate(&self, system: &str, _prompt: &str) -> Result<String, GatewayError> {
            if system.contains("operational") {
                std::future::pending::<()>().await;
            }
            Ok(r#"{"score": 0.8, "rationale": "fine", "suggestions": []}"#.to_string())
        }
    }

    #[tokio::test]
    async fn verdicts_come_back_in_priority_order() {
        let gateway = Arc::new(FixedGateway {
            operational: r#"{"score": 0.9, "rationale": "routes clear", "suggestions": []}"#.into(),
            social: r#"{"score": 0.4, "rationale": "hospital strain", "suggestions": ["stagger departures"]}"#.into(),
            economic: r#"{"score": 0.7, "rationale": "acceptable cost", "suggestions": []}"#.into(),
        });
        let config = WorkflowConfig::default();
        let draft = PlanDraft::initial("evacuate dc-east");

        let verdicts = evaluate(&gateway, &config, &draft, &scenario()).await;

        let domains: Vec<_> = verdicts.iter().map(|v| v.domain).collect();
        assert_eq!(
            domains,
            vec![
                EvaluatorDomain::Operational,
                EvaluatorDomain::Social,
                EvaluatorDomain::Economic
            ]
        );
        assert!(verdicts[0].passed);
        assert!(!verdicts[1].passed);
        assert_eq!(
            verdicts[1].improvement_suggestions,
            vec!["stagger departures".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_evaluator_fails_without_blocking_the_others() {
        let gateway = Arc::new(StalledGateway);
        let config = WorkflowConfig {
            evaluator_timeout: Duration::from_secs(5),
            ..WorkflowConfig::default()
        };
        let draft = PlanDraft::initial("evacuate dc-east");

        let verdicts = evaluate(&gateway, &config, &draft, &scenario()).await;

        assert_eq!(verdicts.len(), 3);
        let operational = &verdicts[0];
        assert_eq!(operational.domain, EvaluatorDomain::Operational);
        assert!(!operational.passed);
        assert_eq!(operational.score, 0.0);
        assert!(operational.rationale.contains("timed out"));
        assert!(verdicts[1].passed);
        assert!(verdicts[2].passed);
    }
}
