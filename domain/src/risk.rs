//! Per-asset risk scoring from threat proximity and severity.
//!
//! Each threat has a kind-specific relevance window. Inside the window its
//! influence on an asset falls off linearly with distance and scales with
//! severity; outside it contributes nothing. Influences from multiple
//! threats combine via a complement product so the exposure stays in
//! [0, 1], and the final score is weighted by the asset's criticality.

use crate::scenario::{Asset, AssetId, Scenario, Threat, ThreatKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Base relevance window per threat kind, in kilometers.
///
/// A storm threatens a much wider area than a localized attack.
fn base_window_km(kind: ThreatKind) -> f64 {
    match kind {
        ThreatKind::Fire => 10.0,
        ThreatKind::Storm => 30.0,
        ThreatKind::Attack => 6.0,
        ThreatKind::Flood => 16.0,
    }
}

/// Severity widens or narrows the window: a severity-1.0 threat reaches
/// 1.5x the base radius, a severity-0.0 threat only 0.5x.
pub fn effective_window_km(threat: &Threat) -> f64 {
    base_window_km(threat.kind) * (0.5 + threat.severity)
}

/// Coarse risk classification derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    High,
    Medium,
    Low,
}

impl RiskBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.5 {
            RiskBand::High
        } else if score >= 0.2 {
            RiskBand::Medium
        } else {
            RiskBand::Low
        }
    }

    /// High and medium band assets need evacuation routes.
    pub fn is_at_risk(&self) -> bool {
        !matches!(self, RiskBand::Low)
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskBand::High => write!(f, "high"),
            RiskBand::Medium => write!(f, "medium"),
            RiskBand::Low => write!(f, "low"),
        }
    }
}

/// One threat's contribution to an asset's exposure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatContribution {
    /// Index of the threat in the scenario's ordered threat list.
    pub threat_index: usize,
    pub kind: ThreatKind,
    pub severity: f64,
    pub distance_km: f64,
    /// Severity-scaled proximity influence in [0, 1].
    pub influence: f64,
}

/// Risk for a single asset: bounded score plus the contributing threats,
/// dominant contribution first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRisk {
    pub score: f64,
    pub contributions: Vec<ThreatContribution>,
}

impl AssetRisk {
    pub fn band(&self) -> RiskBand {
        RiskBand::from_score(self.score)
    }
}

/// Per-asset risk mapping produced by [`assess`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    scores: BTreeMap<AssetId, AssetRisk>,
}

impl RiskAssessment {
    pub fn risk_for(&self, id: &AssetId) -> Option<&AssetRisk> {
        self.scores.get(id)
    }

    pub fn score_for(&self, id: &AssetId) -> f64 {
        self.scores.get(id).map(|r| r.score).unwrap_or(0.0)
    }

    pub fn band_for(&self, id: &AssetId) -> RiskBand {
        RiskBand::from_score(self.score_for(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AssetId, &AssetRisk)> {
        self.scores.iter()
    }

    /// Asset ids in the high or medium band.
    pub fn at_risk_assets(&self) -> impl Iterator<Item = &AssetId> {
        self.scores
            .iter()
            .filter(|(_, r)| r.band().is_at_risk())
            .map(|(id, _)| id)
    }
}

/// Compute per-asset risk for a scenario.
pub fn assess(scenario: &Scenario) -> RiskAssessment {
    let mut scores = BTreeMap::new();

    for asset in scenario.assets() {
        scores.insert(asset.id.clone(), assess_asset(asset, scenario.threats()));
    }

    RiskAssessment { scores }
}

fn assess_asset(asset: &Asset, threats: &[Threat]) -> AssetRisk {
    let mut contributions: Vec<ThreatContribution> = threats
        .iter()
        .enumerate()
        .filter_map(|(index, threat)| {
            let distance_km = asset.location.distance_km(&threat.location);
            let window = effective_window_km(threat);
            if distance_km >= window {
                return None;
            }
            let proximity = 1.0 - distance_km / window;
            let influence = (threat.severity * proximity).clamp(0.0, 1.0);
            Some(ThreatContribution {
                threat_index: index,
                kind: threat.kind,
                severity: threat.severity,
                distance_km,
                influence,
            })
        })
        .collect();

    // Dominant contribution first; equal influence resolved in favor of
    // the higher-severity threat.
    contributions.sort_by(|a, b| {
        b.influence
            .total_cmp(&a.influence)
            .then(b.severity.total_cmp(&a.severity))
            .then(a.threat_index.cmp(&b.threat_index))
    });

    // Complement product keeps combined exposure bounded in [0, 1]
    let exposure = 1.0
        - contributions
            .iter()
            .fold(1.0, |acc, c| acc * (1.0 - c.influence));

    AssetRisk {
        score: (exposure * asset.criticality).clamp(0.0, 1.0),
        contributions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{AssetKind, Location};
    use chrono::Utc;

    fn threat(kind: ThreatKind, lat: f64, lon: f64, severity: f64) -> Threat {
        Threat {
            kind,
            location: Location::new(lat, lon),
            severity,
            reported_at: Utc::now(),
        }
    }

    fn asset(id: &str, lat: f64, lon: f64, criticality: f64) -> Asset {
        Asset {
            id: AssetId::new(id),
            kind: AssetKind::DataCenter,
            location: Location::new(lat, lon),
            criticality,
        }
    }

    #[test]
    fn severe_fire_outranks_mild_storm() {
        // Asset A (criticality 0.8) sits ~1 km from a severity-0.9 fire;
        // asset B (criticality 0.4) sits ~1 km from a severity-0.3 storm.
        let scenario = Scenario::from_parts(
            vec![
                threat(ThreatKind::Fire, 39.480, -0.370, 0.9),
                threat(ThreatKind::Storm, 40.000, -1.000, 0.3),
            ],
            vec![
                asset("asset-a", 39.471, -0.370, 0.8),
                asset("asset-b", 40.009, -1.000, 0.4),
            ],
        );

        let risk = assess(&scenario);
        let a = risk.score_for(&AssetId::new("asset-a"));
        let b = risk.score_for(&AssetId::new("asset-b"));

        assert!(a > b, "expected {} > {}", a, b);
        assert_eq!(risk.band_for(&AssetId::new("asset-a")), RiskBand::High);
    }

    #[test]
    fn distant_threat_contributes_nothing() {
        let scenario = Scenario::from_parts(
            vec![threat(ThreatKind::Attack, 0.0, 0.0, 1.0)],
            vec![asset("far", 50.0, 50.0, 1.0)],
        );

        let risk = assess(&scenario);
        let far = risk.risk_for(&AssetId::new("far")).unwrap();
        assert_eq!(far.score, 0.0);
        assert!(far.contributions.is_empty());
    }

    #[test]
    fn score_stays_bounded_under_many_threats() {
        let threats: Vec<_> = (0..10)
            .map(|i| threat(ThreatKind::Fire, 39.47 + 0.001 * i as f64, -0.37, 1.0))
            .collect();
        let scenario = Scenario::from_parts(threats, vec![asset("dc", 39.47, -0.37, 1.0)]);

        let risk = assess(&scenario);
        let score = risk.score_for(&AssetId::new("dc"));
        assert!((0.0..=1.0).contains(&score));
        assert!(score > 0.9);
    }

    #[test]
    fn equal_influence_resolved_by_severity() {
        // Two threats engineered to the same influence: the stronger
        // severity must come out first.
        let mut weak = threat(ThreatKind::Fire, 39.47, -0.37, 0.5);
        let strong = threat(ThreatKind::Fire, 39.47, -0.37, 1.0);
        // Push the strong threat out so both influences land at 0.5:
        // strong window = 15 km, influence 0.5 at 7.5 km
        weak.location = Location::new(39.47, -0.37);
        let strong_loc = Location::new(39.47 + 7.5 / 111.0, -0.37);
        let strong = Threat {
            location: strong_loc,
            ..strong
        };

        let scenario = Scenario::from_parts(
            vec![weak, strong],
            vec![asset("dc", 39.47, -0.37, 1.0)],
        );

        let risk = assess(&scenario);
        let dc = risk.risk_for(&AssetId::new("dc")).unwrap();
        assert_eq!(dc.contributions.len(), 2);
        let (first, second) = (&dc.contributions[0], &dc.contributions[1]);
        assert!((first.influence - second.influence).abs() < 0.05);
        assert!(first.severity >= second.severity);
    }

    #[test]
    fn criticality_weights_the_score() {
        let t = threat(ThreatKind::Fire, 39.47, -0.37, 0.8);
        let scenario = Scenario::from_parts(
            vec![t],
            vec![
                asset("critical", 39.471, -0.37, 1.0),
                asset("minor", 39.471, -0.37, 0.2),
            ],
        );

        let risk = assess(&scenario);
        let critical = risk.score_for(&AssetId::new("critical"));
        let minor = risk.score_for(&AssetId::new("minor"));
        assert!((critical - minor * 5.0).abs() < 1e-9);
    }

    #[test]
    fn band_thresholds() {
        assert_eq!(RiskBand::from_score(0.6), RiskBand::High);
        assert_eq!(RiskBand::from_score(0.5), RiskBand::High);
        assert_eq!(RiskBand::from_score(0.3), RiskBand::Medium);
        assert_eq!(RiskBand::from_score(0.1), RiskBand::Low);
        assert!(!RiskBand::Low.is_at_risk());
    }
}
