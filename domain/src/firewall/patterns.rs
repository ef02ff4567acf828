//! Detection pattern tables for the input firewall.
//!
//! Patterns are grouped by category so the rejection reason tells the
//! operator what class of attempt was seen. Compiled once on first use.

use regex::Regex;
use std::sync::LazyLock;

pub(super) struct InjectionPattern {
    pub category: &'static str,
    pub regex: Regex,
}

/// (category, case-insensitive pattern) pairs.
const PATTERN_SOURCES: &[(&str, &str)] = &[
    // Attempts to override standing instructions
    (
        "instruction override",
        r"(?i)ignore\s+(previous|above|all|your)\s+(instructions?|prompts?|rules?)",
    ),
    (
        "instruction override",
        r"(?i)disregard\s+(previous|above|all)\s+(instructions?|prompts?)",
    ),
    (
        "instruction override",
        r"(?i)forget\s+(everything|all|previous|your)\s+(instructions?|prompts?)",
    ),
    ("instruction override", r"(?i)new\s+instructions?\s*:"),
    ("instruction override", r"(?i)\b(admin|developer|debug)\s+mode\b"),
    // Role-play redirection
    ("role redirection", r"(?i)you\s+are\s+now\b"),
    ("role redirection", r"(?i)act\s+as\s+(a|an)\s+\w+"),
    ("role redirection", r"(?i)pretend\s+(to\s+be|you\s+are)"),
    ("role redirection", r"(?i)roleplay\s+as\b"),
    // Special-token and markup escapes
    ("token escape", r"<\s*\|[^|]*\|\s*>"),
    ("token escape", r"(?i)\[/?INST\]"),
    ("token escape", r"(?is)```.*system.*```"),
    // Internal-state exfiltration probes
    (
        "exfiltration probe",
        r"(?i)show\s+me\s+(your|the)\s+(prompt|instructions?|system)",
    ),
    (
        "exfiltration probe",
        r"(?i)what\s+(are|is)\s+your\s+(instructions?|prompt|rules?)",
    ),
    (
        "exfiltration probe",
        r"(?i)repeat\s+(your|the)\s+(instructions?|prompt)",
    ),
    ("exfiltration probe", r"(?i)(reveal|print)\s+(your\s+|the\s+)?system\s+prompt"),
    // Known jailbreak markers
    ("jailbreak marker", r"(?i)\bDAN\s+mode\b"),
    ("jailbreak marker", r"(?i)\bjailbreak\b"),
    ("jailbreak marker", r"(?i)unrestricted\s+(mode|assistant|ai)"),
    // Literal code fragments that have no business in an emergency
    // document. Deliberately narrow: bare words like "system" or "fire"
    // are legitimate emergency vocabulary and must not trip the gate.
    ("suspicious fragment", r"(?i)<script"),
    ("suspicious fragment", r"(?i)javascript:"),
    ("suspicious fragment", r"(?i)__import__"),
    ("suspicious fragment", r"(?i)\bexec\("),
    ("suspicious fragment", r"(?i)\beval\("),
];

pub(super) static INJECTION_PATTERNS: LazyLock<Vec<InjectionPattern>> = LazyLock::new(|| {
    PATTERN_SOURCES
        .iter()
        .map(|(category, source)| InjectionPattern {
            category,
            regex: Regex::new(source).expect("firewall pattern must compile"),
        })
        .collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_patterns_compile() {
        assert_eq!(INJECTION_PATTERNS.len(), PATTERN_SOURCES.len());
    }

    #[test]
    fn categories_are_labelled() {
        for pattern in INJECTION_PATTERNS.iter() {
            assert!(!pattern.category.is_empty());
        }
    }
}
