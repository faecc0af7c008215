//! Hospital bed capacity and incoming patients.

use super::BoardError;
use crate::dispatch::{CaseId, Notification, Priority, Vitals};
use serde::{Deserialize, Serialize};

/// Traffic-light level for a ward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapacityLevel {
    Ok,
    Warning,
    Critical,
}

impl std::fmt::Display for CapacityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CapacityLevel::Ok => "ok",
            CapacityLevel::Warning => "warning",
            CapacityLevel::Critical => "critical",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BedCapacity {
    pub bed_type: String,
    pub available: u32,
    pub total: u32,
}

impl BedCapacity {
    pub fn new(bed_type: impl Into<String>, available: u32, total: u32) -> Self {
        Self {
            bed_type: bed_type.into(),
            available: available.min(total),
            total,
        }
    }

    /// Percentage of beds in use. A ward with no beds reads as full.
    pub fn occupancy_percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        f64::from(self.total - self.available) / f64::from(self.total) * 100.0
    }

    /// Level by share of beds still free: at most 10% is critical, at most
    /// 30% is a warning.
    pub fn level(&self) -> CapacityLevel {
        if self.total == 0 {
            return CapacityLevel::Critical;
        }
        let ratio = f64::from(self.available) / f64::from(self.total);
        if ratio <= 0.1 {
            CapacityLevel::Critical
        } else if ratio <= 0.3 {
            CapacityLevel::Warning
        } else {
            CapacityLevel::Ok
        }
    }

    /// Shift available beds by `delta`, clamped to `[0, total]`.
    fn adjust(&mut self, delta: i64) {
        let next = i64::from(self.available).saturating_add(delta);
        self.available = next.clamp(0, i64::from(self.total)) as u32;
    }
}

/// A patient inbound to this hospital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingPatient {
    pub id: CaseId,
    pub priority: Priority,
    pub condition: String,
    pub unit_id: String,
    pub eta_minutes: u32,
    pub vitals: Vitals,
}

#[derive(Debug, Clone, Serialize)]
pub struct HospitalBoard {
    name: String,
    beds: Vec<BedCapacity>,
    incoming: Vec<IncomingPatient>,
}

impl HospitalBoard {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            beds: Vec::new(),
            incoming: Vec::new(),
        }
    }

    /// The board as first shown to staff.
    pub fn demo() -> Self {
        let mut board = Self::new("City General Hospital");
        board.beds = vec![
            BedCapacity::new("ICU", 3, 12),
            BedCapacity::new("Emergency", 8, 20),
            BedCapacity::new("General Ward", 24, 50),
            BedCapacity::new("Pediatric", 6, 10),
        ];
        board.incoming = vec![
            incoming("EMR-2847", Priority::Critical, "Cardiac Emergency", "A-7", 4, (142, "180/110", 37.8)),
            incoming("EMR-2848", Priority::Urgent, "Trauma - MVA", "B-3", 12, (98, "120/80", 36.9)),
            incoming("EMR-2849", Priority::Standard, "Respiratory Distress", "C-1", 18, (88, "130/85", 38.2)),
        ];
        board
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn beds(&self) -> &[BedCapacity] {
        &self.beds
    }

    /// Change available beds in the ward at `index`.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::UnknownWard` if there is no ward at `index`.
    pub fn adjust(&mut self, index: usize, delta: i64) -> Result<Notification, BoardError> {
        let ward = self
            .beds
            .get_mut(index)
            .ok_or(BoardError::UnknownWard(index))?;

        let before = ward.available;
        ward.adjust(delta);

        tracing::info!(
            bed_type = %ward.bed_type,
            before,
            after = ward.available,
            total = ward.total,
            "Bed capacity adjusted"
        );
        Ok(Notification::new(
            "Capacity Updated",
            format!("{} beds updated.", ward.bed_type),
        ))
    }

    pub fn total_available(&self) -> u32 {
        self.beds.iter().map(|b| b.available).sum()
    }

    /// Incoming patients, most severe first, then soonest.
    pub fn incoming_by_priority(&self) -> Vec<&IncomingPatient> {
        let mut patients: Vec<_> = self.incoming.iter().collect();
        patients.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(a.eta_minutes.cmp(&b.eta_minutes))
        });
        patients
    }
}

fn incoming(
    id: &str,
    priority: Priority,
    condition: &str,
    unit_id: &str,
    eta_minutes: u32,
    (heart_rate, blood_pressure, temperature_c): (u32, &str, f64),
) -> IncomingPatient {
    IncomingPatient {
        id: CaseId::new(id),
        priority,
        condition: condition.to_string(),
        unit_id: unit_id.to_string(),
        eta_minutes,
        vitals: Vitals {
            heart_rate,
            blood_pressure: blood_pressure.to_string(),
            temperature_c,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_demo_wards() {
        let board = HospitalBoard::demo();
        let summary: Vec<_> = board
            .beds()
            .iter()
            .map(|b| (b.bed_type.as_str(), b.available, b.total))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("ICU", 3, 12),
                ("Emergency", 8, 20),
                ("General Ward", 24, 50),
                ("Pediatric", 6, 10),
            ]
        );
        assert_eq!(board.total_available(), 41);
    }

    #[test]
    fn test_capacity_levels() {
        assert_eq!(BedCapacity::new("ICU", 3, 12).level(), CapacityLevel::Warning);
        assert_eq!(BedCapacity::new("ICU", 1, 12).level(), CapacityLevel::Critical);
        assert_eq!(BedCapacity::new("Ward", 24, 50).level(), CapacityLevel::Ok);
        assert_eq!(BedCapacity::new("Ward", 15, 50).level(), CapacityLevel::Warning);
        assert_eq!(BedCapacity::new("Ward", 5, 50).level(), CapacityLevel::Critical);
        assert_eq!(BedCapacity::new("Empty", 0, 0).level(), CapacityLevel::Critical);
    }

    #[test]
    fn test_occupancy_percent() {
        assert_eq!(BedCapacity::new("ICU", 3, 12).occupancy_percent(), 75.0);
        assert_eq!(BedCapacity::new("Pediatric", 6, 10).occupancy_percent(), 40.0);
    }

    #[test]
    fn test_adjust_clamps_and_notifies() {
        let mut board = HospitalBoard::demo();

        let notification = board.adjust(0, 100).unwrap();
        assert_eq!(notification.title, "Capacity Updated");
        assert_eq!(notification.description, "ICU beds updated.");
        assert_eq!(board.beds()[0].available, 12);

        board.adjust(0, -100).unwrap();
        assert_eq!(board.beds()[0].available, 0);
    }

    #[test]
    fn test_adjust_extreme_deltas_clamp() {
        let mut board = HospitalBoard::demo();

        board.adjust(0, i64::MAX).unwrap();
        assert_eq!(board.beds()[0].available, 12);

        board.adjust(0, i64::MIN).unwrap();
        assert_eq!(board.beds()[0].available, 0);
    }

    #[test]
    fn test_adjust_unknown_ward() {
        let mut board = HospitalBoard::demo();
        assert_eq!(board.adjust(9, 1).unwrap_err(), BoardError::UnknownWard(9));
    }

    #[test]
    fn test_incoming_sorted_by_severity() {
        let board = HospitalBoard::demo();
        let ids: Vec<_> = board
            .incoming_by_priority()
            .iter()
            .map(|p| p.id.0.as_str())
            .collect();
        assert_eq!(ids, vec!["EMR-2847", "EMR-2848", "EMR-2849"]);
        assert_eq!(board.incoming_by_priority()[0].vitals.heart_rate, 142);
    }

    proptest! {
        #[test]
        fn prop_adjust_stays_in_bounds(
            deltas in proptest::collection::vec(prop_oneof![-30i64..30, any::<i64>()], 0..50),
            ward in 0usize..4,
        ) {
            let mut board = HospitalBoard::demo();
            for delta in deltas {
                board.adjust(ward, delta).unwrap();
                let beds = &board.beds()[ward];
                prop_assert!(beds.available <= beds.total);
            }
        }
    }
}
