//! Structural parsing of scenario input documents.
//!
//! The input is a JSON document with `threats[]` and `assets[]`. Parsing
//! fails with [`ScenarioError::Schema`] listing **every** violated field,
//! not just the first, so the operator can fix the document in one pass.

use super::entities::{Asset, AssetId, AssetKind, Location, Scenario, Threat, ThreatKind};
use crate::firewall::SafeText;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// A single schema violation: the offending field path and what is wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors produced while turning sanitized input into a [`Scenario`].
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Input is not valid JSON: {0}")]
    Malformed(String),

    #[error("Schema validation failed with {} violation(s): {}",
        .0.len(),
        .0.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("; "))]
    Schema(Vec<SchemaViolation>),
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    threats: Option<Vec<RawThreat>>,
    #[serde(default)]
    assets: Option<Vec<RawAsset>>,
}

#[derive(Debug, Deserialize)]
struct RawThreat {
    kind: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    severity: Option<f64>,
    reported_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAsset {
    id: Option<String>,
    kind: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    criticality: Option<f64>,
}

impl Scenario {
    /// Parse a sanitized scenario document.
    ///
    /// Only [`SafeText`] is accepted: raw input must pass the firewall
    /// before it can reach the parser.
    pub fn parse(input: &SafeText) -> Result<Scenario, ScenarioError> {
        let raw: RawDocument = serde_json::from_str(input.as_str())
            .map_err(|e| ScenarioError::Malformed(e.to_string()))?;

        let mut violations = Vec::new();

        let threats = match raw.threats {
            Some(threats) => threats
                .iter()
                .enumerate()
                .filter_map(|(i, t)| parse_threat(i, t, &mut violations))
                .collect(),
            None => {
                violations.push(SchemaViolation {
                    field: "threats".to_string(),
                    message: "missing required field".to_string(),
                });
                Vec::new()
            }
        };

        let assets = match raw.assets {
            Some(assets) => assets
                .iter()
                .enumerate()
                .filter_map(|(i, a)| parse_asset(i, a, &mut violations))
                .collect(),
            None => {
                violations.push(SchemaViolation {
                    field: "assets".to_string(),
                    message: "missing required field".to_string(),
                });
                Vec::new()
            }
        };

        if violations.is_empty() {
            Ok(Scenario::from_parts(threats, assets))
        } else {
            Err(ScenarioError::Schema(violations))
        }
    }
}

fn parse_threat(
    index: usize,
    raw: &RawThreat,
    violations: &mut Vec<SchemaViolation>,
) -> Option<Threat> {
    let path = |field: &str| format!("threats[{}].{}", index, field);
    let before = violations.len();

    let kind = require(violations, path("kind"), raw.kind.as_ref()).and_then(|s| {
        s.parse::<ThreatKind>()
            .map_err(|e| {
                violations.push(SchemaViolation {
                    field: path("kind"),
                    message: e,
                });
            })
            .ok()
    });

    let location = parse_location(violations, &path("lat"), &path("lon"), raw.lat, raw.lon);

    let severity = require(violations, path("severity"), raw.severity).filter(|s| {
        let ok = (0.0..=1.0).contains(s);
        if !ok {
            violations.push(SchemaViolation {
                field: path("severity"),
                message: format!("{} out of valid range [0, 1]", s),
            });
        }
        ok
    });

    let reported_at = require(violations, path("reported_at"), raw.reported_at.as_ref())
        .and_then(|s| {
            s.parse::<DateTime<Utc>>()
                .map_err(|e| {
                    violations.push(SchemaViolation {
                        field: path("reported_at"),
                        message: format!("not an RFC 3339 timestamp: {}", e),
                    });
                })
                .ok()
        });

    if violations.len() > before {
        return None;
    }

    Some(Threat {
        kind: kind?,
        location: location?,
        severity: severity?,
        reported_at: reported_at?,
    })
}

fn parse_asset(
    index: usize,
    raw: &RawAsset,
    violations: &mut Vec<SchemaViolation>,
) -> Option<Asset> {
    let path = |field: &str| format!("assets[{}].{}", index, field);
    let before = violations.len();

    let id = require(violations, path("id"), raw.id.as_ref()).filter(|s| {
        let ok = !s.trim().is_empty();
        if !ok {
            violations.push(SchemaViolation {
                field: path("id"),
                message: "must not be empty".to_string(),
            });
        }
        ok
    });

    let kind = require(violations, path("kind"), raw.kind.as_ref()).and_then(|s| {
        s.parse::<AssetKind>()
            .map_err(|e| {
                violations.push(SchemaViolation {
                    field: path("kind"),
                    message: e,
                });
            })
            .ok()
    });

    let location = parse_location(violations, &path("lat"), &path("lon"), raw.lat, raw.lon);

    let criticality = require(violations, path("criticality"), raw.criticality).filter(|c| {
        let ok = (0.0..=1.0).contains(c);
        if !ok {
            violations.push(SchemaViolation {
                field: path("criticality"),
                message: format!("{} out of valid range [0, 1]", c),
            });
        }
        ok
    });

    if violations.len() > before {
        return None;
    }

    Some(Asset {
        id: AssetId::new(id?.clone()),
        kind: kind?,
        location: location?,
        criticality: criticality?,
    })
}

fn parse_location(
    violations: &mut Vec<SchemaViolation>,
    lat_path: &str,
    lon_path: &str,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Option<Location> {
    let lat = require(violations, lat_path.to_string(), lat).filter(|v| {
        let ok = (-90.0..=90.0).contains(v);
        if !ok {
            violations.push(SchemaViolation {
                field: lat_path.to_string(),
                message: format!("latitude {} out of valid range [-90, 90]", v),
            });
        }
        ok
    });
    let lon = require(violations, lon_path.to_string(), lon).filter(|v| {
        let ok = (-180.0..=180.0).contains(v);
        if !ok {
            violations.push(SchemaViolation {
                field: lon_path.to_string(),
                message: format!("longitude {} out of valid range [-180, 180]", v),
            });
        }
        ok
    });

    Some(Location::new(lat?, lon?))
}

fn require<T: Clone>(
    violations: &mut Vec<SchemaViolation>,
    field: String,
    value: Option<T>,
) -> Option<T> {
    if value.is_none() {
        violations.push(SchemaViolation {
            field,
            message: "missing required field".to_string(),
        });
    }
    value
}
