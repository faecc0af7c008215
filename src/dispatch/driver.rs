//! Driver in-cab dashboard lifecycle.

use super::{DispatchCase, Notification};
use serde::{Deserialize, Serialize};

/// Driver-side state:
/// `available → dispatched → enroute → onscene → transporting → available`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverStatus {
    Available,
    Dispatched,
    EnRoute,
    OnScene,
    Transporting,
}

impl DriverStatus {
    /// Display tone of the status indicator.
    pub fn tone(self) -> StatusTone {
        match self {
            DriverStatus::Available => StatusTone::Ok,
            DriverStatus::Dispatched | DriverStatus::EnRoute => StatusTone::Warning,
            DriverStatus::OnScene | DriverStatus::Transporting => StatusTone::Critical,
        }
    }
}

impl std::fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DriverStatus::Available => "available",
            DriverStatus::Dispatched => "dispatched",
            DriverStatus::EnRoute => "enroute",
            DriverStatus::OnScene => "onscene",
            DriverStatus::Transporting => "transporting",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for DriverStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(DriverStatus::Available),
            "dispatched" => Ok(DriverStatus::Dispatched),
            "enroute" => Ok(DriverStatus::EnRoute),
            "onscene" => Ok(DriverStatus::OnScene),
            "transporting" => Ok(DriverStatus::Transporting),
            _ => Err(format!("Invalid driver status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    Ok,
    Warning,
    Critical,
}

/// The quick-status buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverControl {
    Available,
    EnRoute,
    OnScene,
    Transport,
}

impl DriverControl {
    pub const ALL: [DriverControl; 4] = [
        DriverControl::Available,
        DriverControl::EnRoute,
        DriverControl::OnScene,
        DriverControl::Transport,
    ];

    /// State the control moves to.
    pub fn target(self) -> DriverStatus {
        match self {
            DriverControl::Available => DriverStatus::Available,
            DriverControl::EnRoute => DriverStatus::EnRoute,
            DriverControl::OnScene => DriverStatus::OnScene,
            DriverControl::Transport => DriverStatus::Transporting,
        }
    }

    /// State the machine must be in for the control to be enabled.
    fn required(self) -> DriverStatus {
        match self {
            // Re-announces availability; only meaningful without a case.
            DriverControl::Available => DriverStatus::Available,
            DriverControl::EnRoute => DriverStatus::Dispatched,
            DriverControl::OnScene => DriverStatus::EnRoute,
            DriverControl::Transport => DriverStatus::OnScene,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DriverControl::Available => "Available",
            DriverControl::EnRoute => "En Route",
            DriverControl::OnScene => "On Scene",
            DriverControl::Transport => "Transport",
        }
    }
}

impl std::str::FromStr for DriverControl {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "available" => Ok(DriverControl::Available),
            "enroute" => Ok(DriverControl::EnRoute),
            "onscene" => Ok(DriverControl::OnScene),
            "transport" | "transporting" => Ok(DriverControl::Transport),
            _ => Err(format!("Unknown driver control: {}", s)),
        }
    }
}

/// The driver-side machine for one unit.
#[derive(Debug, Clone)]
pub struct DriverDashboard {
    status: DriverStatus,
    case: Option<DispatchCase>,
    unit_id: String,
    driver_name: String,
}

impl DriverDashboard {
    pub fn new(unit_id: impl Into<String>, driver_name: impl Into<String>) -> Self {
        Self {
            status: DriverStatus::Available,
            case: None,
            unit_id: unit_id.into(),
            driver_name: driver_name.into(),
        }
    }

    pub fn status(&self) -> DriverStatus {
        self.status
    }

    pub fn case(&self) -> Option<&DispatchCase> {
        self.case.as_ref()
    }

    pub fn unit_id(&self) -> &str {
        &self.unit_id
    }

    pub fn driver_name(&self) -> &str {
        &self.driver_name
    }

    /// Overwrite the active case's ETA. No-op without a case.
    pub fn set_eta(&mut self, eta_minutes: u32) {
        if let Some(case) = self.case.as_mut() {
            case.eta_minutes = eta_minutes;
        }
    }

    /// Whether "Simulate New Case" is enabled.
    pub fn can_accept_case(&self) -> bool {
        self.status == DriverStatus::Available && self.case.is_none()
    }

    /// Assign the demo case. No-op unless available.
    pub fn simulate_new_case(&mut self) -> Option<Notification> {
        self.assign_case(DispatchCase::demo())
    }

    /// Assign `case`. No-op unless available.
    pub fn assign_case(&mut self, mut case: DispatchCase) -> Option<Notification> {
        if !self.can_accept_case() {
            tracing::debug!(status = %self.status, "New case ignored, unit busy");
            return None;
        }

        case.unit_id = self.unit_id.clone();
        let description = format!(
            "{} case assigned. Review details below.",
            capitalize(&case.priority.to_string())
        );

        tracing::info!(
            case_id = %case.id,
            priority = %case.priority,
            unit_id = %self.unit_id,
            "Case assigned"
        );
        self.case = Some(case);
        self.status = DriverStatus::Dispatched;

        Some(Notification::new("New Emergency Case", description))
    }

    pub fn can(&self, control: DriverControl) -> bool {
        let has_case = self.case.is_some();
        match control {
            DriverControl::Available => !has_case && self.status == control.required(),
            _ => has_case && self.status == control.required(),
        }
    }

    /// Controls currently enabled, in button order.
    pub fn enabled_controls(&self) -> Vec<DriverControl> {
        DriverControl::ALL
            .into_iter()
            .filter(|c| self.can(*c))
            .collect()
    }

    /// Press a status control. No-op when the control is disabled.
    pub fn update_status(&mut self, control: DriverControl) -> Option<Notification> {
        if !self.can(control) {
            tracing::debug!(?control, status = %self.status, "Status control disabled");
            return None;
        }

        let old_status = self.status;
        self.status = control.target();

        tracing::info!(
            unit_id = %self.unit_id,
            old_status = %old_status,
            new_status = %self.status,
            "Driver status changed"
        );
        Some(Notification::new("Status Updated", status_message(self.status)))
    }

    pub fn can_complete_handoff(&self) -> bool {
        self.case.is_some() && self.status == DriverStatus::Transporting
    }

    /// Hand the patient off, clear the case and become available.
    pub fn complete_handoff(&mut self) -> Option<Notification> {
        if !self.can_complete_handoff() {
            return None;
        }

        let case = self.case.take();
        self.status = DriverStatus::Available;

        tracing::info!(
            case_id = ?case.map(|c| c.id.0),
            unit_id = %self.unit_id,
            "Case completed"
        );
        Some(Notification::new(
            "Case Completed",
            "Patient handoff successful. Ready for new dispatch.",
        ))
    }
}

impl Default for DriverDashboard {
    fn default() -> Self {
        Self::new("A-7", "Michael Chen")
    }
}

fn status_message(status: DriverStatus) -> &'static str {
    match status {
        DriverStatus::Available => "Status: Available for dispatch",
        DriverStatus::Dispatched => "Case accepted. Starting navigation.",
        DriverStatus::EnRoute => "En route to patient location.",
        DriverStatus::OnScene => "Arrived at scene. Providing care.",
        DriverStatus::Transporting => "Transporting to hospital.",
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
