//! Control center fleet overview.

use super::BoardError;
use crate::dispatch::DriverStatus;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// One ambulance as the control center sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub driver_name: String,
    pub status: DriverStatus,
    pub location: String,
    pub eta_minutes: Option<u32>,
}

impl Unit {
    pub fn new(
        id: impl Into<String>,
        driver_name: impl Into<String>,
        status: DriverStatus,
        location: impl Into<String>,
        eta_minutes: Option<u32>,
    ) -> Self {
        Self {
            id: id.into(),
            driver_name: driver_name.into(),
            status,
            location: location.into(),
            eta_minutes,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status != DriverStatus::Available
    }
}

/// Thread-safe store of units keyed by unit id.
#[derive(Debug, Default)]
pub struct FleetRegistry {
    units: DashMap<String, Unit>,
}

impl FleetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::DuplicateUnit` if the id is taken.
    pub fn add_unit(&self, unit: Unit) -> Result<(), BoardError> {
        if self.units.contains_key(&unit.id) {
            return Err(BoardError::DuplicateUnit(unit.id));
        }
        self.units.insert(unit.id.clone(), unit);
        Ok(())
    }

    /// All units, ordered by id for stable display.
    pub fn all_units(&self) -> Vec<Unit> {
        let mut units: Vec<Unit> = self.units.iter().map(|e| e.value().clone()).collect();
        units.sort_by(|a, b| a.id.cmp(&b.id));
        units
    }

    /// Record a status change reported by a unit.
    ///
    /// An available unit has no ETA.
    pub fn update_status(
        &self,
        id: &str,
        status: DriverStatus,
        eta_minutes: Option<u32>,
    ) -> Result<Unit, BoardError> {
        let mut entry = self
            .units
            .get_mut(id)
            .ok_or_else(|| BoardError::UnknownUnit(id.to_string()))?;

        let old_status = entry.status;
        entry.status = status;
        entry.eta_minutes = if status == DriverStatus::Available {
            None
        } else {
            eta_minutes
        };

        tracing::info!(
            unit_id = %id,
            old_status = %old_status,
            new_status = %status,
            "Fleet unit status changed"
        );
        Ok(entry.value().clone())
    }

    pub fn total_count(&self) -> usize {
        self.units.len()
    }

    /// Units not currently `available`.
    pub fn active_count(&self) -> usize {
        self.units.iter().filter(|e| e.value().is_active()).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentZone {
    pub name: String,
    pub incidents: u32,
    pub risk: RiskLevel,
}

/// A headline number with its change against the previous period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMetric {
    pub label: String,
    pub value: String,
    pub change: Option<String>,
}

impl KeyMetric {
    fn new(label: &str, value: impl Into<String>, change: Option<&str>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            change: change.map(str::to_string),
        }
    }
}

/// Fleet, incident zones and headline metrics for the control center.
#[derive(Debug)]
pub struct ControlCenter {
    fleet: FleetRegistry,
    zones: Vec<IncidentZone>,
}

impl ControlCenter {
    pub fn new(fleet: FleetRegistry, zones: Vec<IncidentZone>) -> Self {
        Self { fleet, zones }
    }

    pub fn demo() -> Self {
        use DriverStatus::*;

        let fleet = FleetRegistry::new();
        let units = [
            Unit::new("A-7", "Michael Chen", EnRoute, "Downtown", Some(4)),
            Unit::new("B-3", "Sarah Johnson", OnScene, "Westside", None),
            Unit::new("C-1", "David Park", Available, "North Station", None),
            Unit::new("A-2", "Emily Davis", Dispatched, "East District", Some(8)),
            Unit::new("B-5", "James Wilson", Available, "Central Hub", None),
            Unit::new("C-4", "Lisa Martinez", EnRoute, "Southside", Some(6)),
        ];
        for unit in units {
            // Ids above are unique.
            let _ = fleet.add_unit(unit);
        }

        let zones = [
            ("Downtown", 24, RiskLevel::High),
            ("Westside", 12, RiskLevel::Medium),
            ("North District", 6, RiskLevel::Low),
            ("East Zone", 18, RiskLevel::High),
            ("South Area", 9, RiskLevel::Medium),
        ]
        .into_iter()
        .map(|(name, incidents, risk)| IncidentZone {
            name: name.to_string(),
            incidents,
            risk,
        })
        .collect();

        Self::new(fleet, zones)
    }

    pub fn fleet(&self) -> &FleetRegistry {
        &self.fleet
    }

    /// Zones with the most incidents first.
    pub fn zones_by_incidents(&self) -> Vec<IncidentZone> {
        let mut zones = self.zones.clone();
        zones.sort_by(|a, b| b.incidents.cmp(&a.incidents));
        zones
    }

    pub fn key_metrics(&self) -> Vec<KeyMetric> {
        let active = format!("{}/{}", self.fleet.active_count(), self.fleet.total_count());
        vec![
            KeyMetric::new("Avg Response Time", "6.2 min", Some("-12%")),
            KeyMetric::new("Active Ambulances", active, None),
            KeyMetric::new("Hospital Capacity", "78%", Some("+5%")),
            KeyMetric::new("Cases Today", "47", Some("+8%")),
        ]
    }
}
