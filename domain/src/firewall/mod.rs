//! Input firewall: injection defense for externally-sourced text.
//!
//! Any text that originates outside the trusted configuration boundary
//! (scenario documents, generation-derived feedback) must pass
//! [`sanitize`] before it can reach the parser or any prompt builder.
//! The gate is pure and idempotent: safe text is returned unchanged, so
//! `sanitize(sanitize(x)) == sanitize(x)`.

mod patterns;

use patterns::INJECTION_PATTERNS;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Text that has passed the firewall.
///
/// This is the only text type the scenario parser and the prompt
/// templates accept, so unsanitized input cannot reach a reasoning
/// stage by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SafeText(String);

impl SafeText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for SafeText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Span of the input that triggered detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffendingSpan {
    /// Byte offset where the match starts.
    pub start: usize,
    /// Byte offset where the match ends.
    pub end: usize,
    /// The matched text itself.
    pub excerpt: String,
}

/// Raised when externally-sourced text looks like an attempt to redirect
/// the system's reasoning. Fatal to the current input; the text must
/// never be forwarded downstream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Injection detected: {reason} (at bytes {}..{}: {:?})", span.start, span.end, span.excerpt)]
pub struct InjectionDetected {
    pub reason: String,
    pub span: OffendingSpan,
}

/// Screen text for injection attempts.
///
/// Checks for instruction-override phrasing, role-play redirection,
/// special-token escapes, internal-state exfiltration probes, jailbreak
/// markers, and suspicious code fragments. All matching runs directly
/// over the input, so reported spans are byte offsets into `raw`.
/// Returns the text unchanged when clean.
pub fn sanitize(raw: &str) -> Result<SafeText, InjectionDetected> {
    for pattern in INJECTION_PATTERNS.iter() {
        if let Some(m) = pattern.regex.find(raw) {
            return Err(InjectionDetected {
                reason: format!("matched {} pattern", pattern.category),
                span: OffendingSpan {
                    start: m.start(),
                    end: m.end(),
                    excerpt: m.as_str().to_string(),
                },
            });
        }
    }

    Ok(SafeText(raw.to_string()))
}
