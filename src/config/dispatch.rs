//! Patient dispatch timeline configuration

use serde::{Deserialize, Serialize};

/// Fixed offsets and ETAs of the simulated patient-side dispatch sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Unit announced to the patient
    pub unit_id: String,
    /// Delay before the unit is reported on the way
    pub en_route_after_ms: u64,
    /// Delay before the ETA is revised
    pub eta_update_after_ms: u64,
    /// Delay before the unit is reported arrived
    pub arrival_after_ms: u64,
    pub initial_eta_minutes: u32,
    pub updated_eta_minutes: u32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            unit_id: "A-7".to_string(),
            en_route_after_ms: 2000,
            eta_update_after_ms: 5000,
            arrival_after_ms: 8000,
            initial_eta_minutes: 8,
            updated_eta_minutes: 4,
        }
    }
}
