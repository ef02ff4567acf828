//! Verdict extraction from free-form generation output.
//!
//! The content-generation collaborator has no guaranteed determinism, so
//! evaluators accept several response shapes. Pure text processing, no
//! I/O.
//!
//! Supported formats, in preference order:
//!
//! 1. **JSON**: `{"score": 0.8, "rationale": "...", "suggestions": ["..."]}`
//! 2. **Labelled score**: a `score: 0.8` or `SCORE: 8/10` line, with any
//!    `- ` bullet lines collected as suggestions
//!
//! An unparseable response yields a 0.0 score, so an evaluator can only
//! approve a plan it actually scored.

/// Structured fields recovered from an evaluator response.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedVerdict {
    /// Score normalized to [0, 1].
    pub score: f64,
    pub rationale: String,
    pub suggestions: Vec<String>,
}

/// Parse an evaluator response into score, rationale, and suggestions.
pub fn parse_verdict_response(response: &str) -> ParsedVerdict {
    if let Some(parsed) = parse_json_verdict(response) {
        return parsed;
    }
    parse_labelled_verdict(response)
}

fn parse_json_verdict(response: &str) -> Option<ParsedVerdict> {
    let start = response.find('{')?;
    let end = response[start..].rfind('}')?;
    let json_str = &response[start..start + end + 1];
    let parsed: serde_json::Value = serde_json::from_str(json_str).ok()?;

    let score = parsed.get("score")?.as_f64()?;
    // Scores may come back on a 0-10 scale; normalize
    let score = if score > 1.0 { score / 10.0 } else { score };

    let rationale = parsed
        .get("rationale")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let suggestions = parsed
        .get("suggestions")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(ParsedVerdict {
        score: score.clamp(0.0, 1.0),
        rationale,
        suggestions,
    })
}

fn parse_labelled_verdict(response: &str) -> ParsedVerdict {
    let mut score = None;
    let mut suggestions = Vec::new();

    for line in response.lines() {
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix("- ") {
            if !rest.is_empty() {
                suggestions.push(rest.to_string());
            }
            continue;
        }

        // Find and tokenize on the same lowercased copy: case folding
        // can change byte lengths, so offsets from one representation
        // must never index the other. Digits are unaffected by folding.
        let lowered = trimmed.to_lowercase();
        if score.is_none()
            && let Some(idx) = lowered.find("score")
        {
            let after = lowered[idx + "score".len()..].trim_start_matches([':', ' ', '=']);
            let token = after.split_whitespace().next().unwrap_or("");
            if let Some(num_str) = token.strip_suffix("/10")
                && let Ok(num) = num_str.parse::<f64>()
            {
                score = Some((num / 10.0).clamp(0.0, 1.0));
            } else if let Ok(num) = token.trim_end_matches(['.', ',']).parse::<f64>() {
                let num = if num > 1.0 { num / 10.0 } else { num };
                score = Some(num.clamp(0.0, 1.0));
            }
        }
    }

    ParsedVerdict {
        // Unscored responses fail closed
        score: score.unwrap_or(0.0),
        rationale: response.trim().to_string(),
        suggestions,
    }
}
