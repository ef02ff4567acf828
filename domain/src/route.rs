//! Candidate evacuation routes for at-risk assets.
//!
//! For every asset in the high or medium risk band, [`plan_routes`]
//! derives candidate routes to safe zones. Destinations that are
//! themselves at high risk are excluded, as are routes that pass close
//! to a severe threat. An asset with no surviving candidate gets a
//! [`NoSafeRouteWarning`] instead of failing the whole run.

use crate::risk::{RiskAssessment, RiskBand};
use crate::scenario::{Asset, AssetId, Location, Scenario, Threat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Average evacuation speed under emergency conditions, km/h.
const EVACUATION_SPEED_KMH: f64 = 40.0;
/// Fixed preparation and loading overhead, minutes.
const PREPARATION_MINUTES: f64 = 10.0;
/// Severity at or above which a threat blocks nearby route segments.
const SEVERE_THREAT: f64 = 0.7;

/// How workable a route is given its length and duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteFeasibility {
    /// Under 30 minutes and under 20 km.
    Feasible,
    /// Under an hour and under 50 km.
    Challenging,
    /// Anything longer.
    Critical,
}

impl RouteFeasibility {
    fn grade(distance_km: f64, minutes: f64) -> Self {
        if minutes < 30.0 && distance_km < 20.0 {
            RouteFeasibility::Feasible
        } else if minutes < 60.0 && distance_km < 50.0 {
            RouteFeasibility::Challenging
        } else {
            RouteFeasibility::Critical
        }
    }
}

/// A candidate evacuation route from an asset to a safe zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRoute {
    pub asset_id: AssetId,
    pub destination: AssetId,
    pub distance_km: f64,
    pub estimated_minutes: f64,
    pub feasibility: RouteFeasibility,
}

/// Non-fatal warning: no viable evacuation route exists for an asset.
///
/// Attached to the workflow state and visible in the final output even
/// when the plan is approved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoSafeRouteWarning {
    pub asset_id: AssetId,
    pub reason: String,
}

/// Candidate routes per asset plus warnings for assets with none.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSet {
    routes: BTreeMap<AssetId, Vec<CandidateRoute>>,
    warnings: Vec<NoSafeRouteWarning>,
}

impl RouteSet {
    pub fn routes_for(&self, id: &AssetId) -> &[CandidateRoute] {
        self.routes.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AssetId, &[CandidateRoute])> {
        self.routes.iter().map(|(id, r)| (id, r.as_slice()))
    }

    pub fn warnings(&self) -> &[NoSafeRouteWarning] {
        &self.warnings
    }
}

/// Derive candidate evacuation routes for every at-risk asset.
pub fn plan_routes(scenario: &Scenario, risk: &RiskAssessment) -> RouteSet {
    let safe_zones: Vec<&Asset> = scenario.safe_zones().collect();

    let mut routes = BTreeMap::new();
    let mut warnings = Vec::new();

    for asset_id in risk.at_risk_assets() {
        let Some(asset) = scenario.asset(asset_id) else {
            continue;
        };
        if asset.kind.is_safe_zone() {
            continue;
        }

        let mut candidates: Vec<CandidateRoute> = safe_zones
            .iter()
            .filter(|zone| risk.band_for(&zone.id) != RiskBand::High)
            .filter(|zone| route_is_clear(&asset.location, &zone.location, scenario.threats()))
            .map(|zone| {
                let distance_km = asset.location.distance_km(&zone.location);
                let estimated_minutes =
                    distance_km / EVACUATION_SPEED_KMH * 60.0 + PREPARATION_MINUTES;
                CandidateRoute {
                    asset_id: asset.id.clone(),
                    destination: zone.id.clone(),
                    distance_km,
                    estimated_minutes,
                    feasibility: RouteFeasibility::grade(distance_km, estimated_minutes),
                }
            })
            .collect();

        candidates.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

        if candidates.is_empty() {
            let reason = if safe_zones.is_empty() {
                "no safe zones in scenario".to_string()
            } else {
                "all safe zones are at high risk or behind severe threats".to_string()
            };
            warnings.push(NoSafeRouteWarning {
                asset_id: asset.id.clone(),
                reason,
            });
        } else {
            routes.insert(asset.id.clone(), candidates);
        }
    }

    RouteSet { routes, warnings }
}

/// Straight-line route clearance check against severe threats.
///
/// Samples the midpoint and destination of the segment; a severe threat
/// within half its relevance window of either sample blocks the route.
/// The origin is deliberately not sampled: the evacuating asset is
/// usually near the threat already, which is the reason it is moving.
fn route_is_clear(from: &Location, to: &Location, threats: &[Threat]) -> bool {
    let midpoint = Location::new((from.lat + to.lat) / 2.0, (from.lon + to.lon) / 2.0);
    let samples = [&midpoint, to];

    threats
        .iter()
        .filter(|t| t.severity >= SEVERE_THREAT)
        .all(|t| {
            let clearance = crate::risk::effective_window_km(t) / 2.0;
            samples
                .iter()
                .all(|&point| t.location.distance_km(point) >= clearance)
        })
}
