//! Scenario entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of threat reported in a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatKind {
    Fire,
    Storm,
    Attack,
    Flood,
}

impl ThreatKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatKind::Fire => "fire",
            ThreatKind::Storm => "storm",
            ThreatKind::Attack => "attack",
            ThreatKind::Flood => "flood",
        }
    }
}

impl std::fmt::Display for ThreatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ThreatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fire" => Ok(ThreatKind::Fire),
            "storm" | "heavy_storm" => Ok(ThreatKind::Storm),
            "attack" | "terrorist" => Ok(ThreatKind::Attack),
            "flood" => Ok(ThreatKind::Flood),
            _ => Err(format!(
                "Unknown threat kind: {}. Valid: fire, storm, attack, flood",
                s
            )),
        }
    }
}

/// Kind of critical asset on the map.
///
/// `SafeZone` assets are evacuation destinations; `FireStation` and
/// `Hospital` can act as helpers in an approved plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    DataCenter,
    EnergyPlant,
    RadarStation,
    Hospital,
    FireStation,
    SafeZone,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::DataCenter => "data_center",
            AssetKind::EnergyPlant => "energy_plant",
            AssetKind::RadarStation => "radar_station",
            AssetKind::Hospital => "hospital",
            AssetKind::FireStation => "fire_station",
            AssetKind::SafeZone => "safe_zone",
        }
    }

    /// Whether this asset is a candidate evacuation destination.
    pub fn is_safe_zone(&self) -> bool {
        matches!(self, AssetKind::SafeZone)
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AssetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "data_center" | "datacenter" => Ok(AssetKind::DataCenter),
            "energy_plant" | "energyplant" => Ok(AssetKind::EnergyPlant),
            "radar_station" | "radar" => Ok(AssetKind::RadarStation),
            "hospital" => Ok(AssetKind::Hospital),
            "fire_station" | "firestation" => Ok(AssetKind::FireStation),
            "safe_zone" | "safeplace" | "safe_place" => Ok(AssetKind::SafeZone),
            _ => Err(format!(
                "Unknown asset kind: {}. Valid: data_center, energy_plant, radar_station, hospital, fire_station, safe_zone",
                s
            )),
        }
    }
}

/// Geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to another location, in kilometers.
    pub fn distance_km(&self, other: &Location) -> f64 {
        crate::geo::haversine_km(self.lat, self.lon, other.lat, other.lon)
    }

    /// Both coordinates within valid geographic ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// A reported threat. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threat {
    pub kind: ThreatKind,
    pub location: Location,
    /// Intensity in [0, 1].
    pub severity: f64,
    pub reported_at: DateTime<Utc>,
}

/// Identifier for an asset, unique within a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A critical asset. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub kind: AssetKind,
    pub location: Location,
    /// Configured importance weight in [0, 1], independent of current
    /// threat exposure.
    pub criticality: f64,
}

/// An emergency scenario: ordered threats and ordered assets.
///
/// Produced once by [`Scenario::parse`](crate::scenario) from sanitized
/// input; read-only thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    threats: Vec<Threat>,
    assets: Vec<Asset>,
}

impl Scenario {
    pub(crate) fn from_parts(threats: Vec<Threat>, assets: Vec<Asset>) -> Self {
        Self { threats, assets }
    }

    pub fn threats(&self) -> &[Threat] {
        &self.threats
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn asset(&self, id: &AssetId) -> Option<&Asset> {
        self.assets.iter().find(|a| &a.id == id)
    }

    /// Assets usable as evacuation destinations.
    pub fn safe_zones(&self) -> impl Iterator<Item = &Asset> {
        self.assets.iter().filter(|a| a.kind.is_safe_zone())
    }
}
