//! Dispatch lifecycle state machines.
//!
//! Two independent machines track one active case each: the patient-side
//! [`PatientDispatch`] (SOS trigger with a fixed timeline) and the driver-side
//! [`DriverDashboard`] (explicit status controls). Invalid triggers are no-ops.

mod driver;
mod notification;
mod patient;

pub use driver::*;
pub use notification::Notification;
pub use patient::*;

use crate::simulation::Coordinate;
use serde::{Deserialize, Serialize};

/// Triage priority, used for display styling only.
///
/// Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Standard,
    Urgent,
    Critical,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Priority::Standard => "standard",
            Priority::Urgent => "urgent",
            Priority::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// Case identifier such as `EMR-2847`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(pub String);

impl CaseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Vitals snapshot attached to a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub heart_rate: u32,
    pub blood_pressure: String,
    pub temperature_c: f64,
}

/// One emergency request, owned by the session that created it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchCase {
    pub id: CaseId,
    pub patient_name: String,
    pub address: String,
    pub location: Coordinate,
    pub priority: Priority,
    pub unit_id: String,
    pub hospital: String,
    pub hospital_location: Coordinate,
    pub vitals: Option<Vitals>,
    pub eta_minutes: u32,
}

impl DispatchCase {
    /// The case handed to the driver by "Simulate New Case".
    pub fn demo() -> Self {
        Self {
            id: CaseId::new("EMR-2847"),
            patient_name: "John Doe".to_string(),
            address: "123 Main Street, Downtown".to_string(),
            location: Coordinate::new(-73.999, 40.7225),
            priority: Priority::Critical,
            unit_id: "A-7".to_string(),
            hospital: "City General Hospital".to_string(),
            hospital_location: Coordinate::new(-73.987, 40.739),
            vitals: None,
            eta_minutes: 6,
        }
    }
}
