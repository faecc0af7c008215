//! Patient-side SOS dispatch lifecycle.

use super::Notification;
use crate::config::DispatchConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Patient-side dispatch state: `idle → dispatching → onway → arrived → idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatientStatus {
    Idle,
    Dispatching,
    OnWay,
    Arrived,
}

impl std::fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PatientStatus::Idle => "idle",
            PatientStatus::Dispatching => "dispatching",
            PatientStatus::OnWay => "onway",
            PatientStatus::Arrived => "arrived",
        };
        f.write_str(s)
    }
}

/// Labels of the progress tracker, indexed by [`PatientDispatch::progress`].
pub const PROGRESS_STEPS: [&str; 3] = ["Dispatched", "On the Way", "Arrived"];

/// A timer-driven step of the patient timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineStep {
    /// Unit reported on the way with the initial ETA
    UnitEnRoute,
    /// ETA revised downward, no state change
    EtaRevised,
    /// Unit reported at the patient's location
    UnitArrived,
}

impl TimelineStep {
    /// State the machine must be in for this step to apply.
    pub fn expected_status(self) -> PatientStatus {
        match self {
            TimelineStep::UnitEnRoute => PatientStatus::Dispatching,
            TimelineStep::EtaRevised | TimelineStep::UnitArrived => PatientStatus::OnWay,
        }
    }
}

/// A step and its offset from dispatch initiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledStep {
    pub after: Duration,
    pub step: TimelineStep,
}

/// Result of applying a timeline step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Stale generation or wrong state; nothing changed
    Ignored,
    /// Step applied, with the notification it emits (if any)
    Applied(Option<Notification>),
}

/// The patient-side machine. Owns no timers; the caller schedules
/// [`PatientDispatch::timeline`] and feeds steps back in.
#[derive(Debug, Clone)]
pub struct PatientDispatch {
    status: PatientStatus,
    eta_minutes: Option<u32>,
    generation: u64,
    config: DispatchConfig,
}

impl PatientDispatch {
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            status: PatientStatus::Idle,
            eta_minutes: None,
            generation: 0,
            config,
        }
    }

    pub fn status(&self) -> PatientStatus {
        self.status
    }

    pub fn eta_minutes(&self) -> Option<u32> {
        self.eta_minutes
    }

    /// Incremented on every accepted dispatch. Timeline steps carry the
    /// generation they were scheduled for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn unit_id(&self) -> &str {
        &self.config.unit_id
    }

    /// Index into [`PROGRESS_STEPS`], `None` while idle.
    pub fn progress(&self) -> Option<usize> {
        match self.status {
            PatientStatus::Idle => None,
            PatientStatus::Dispatching => Some(0),
            PatientStatus::OnWay => Some(1),
            PatientStatus::Arrived => Some(2),
        }
    }

    /// Whether the SOS control is enabled.
    pub fn can_trigger(&self) -> bool {
        self.status == PatientStatus::Idle
    }

    /// Whether the "Close Request" control is enabled.
    pub fn can_close(&self) -> bool {
        self.status == PatientStatus::Arrived
    }

    /// Start a dispatch. No-op unless idle.
    pub fn trigger_dispatch(&mut self) -> Option<Notification> {
        if !self.can_trigger() {
            tracing::debug!(status = %self.status, "Dispatch trigger ignored");
            return None;
        }

        self.generation += 1;
        self.status = PatientStatus::Dispatching;
        self.eta_minutes = None;

        tracing::info!(generation = self.generation, "Emergency dispatch triggered");
        Some(Notification::new(
            "Emergency Dispatched",
            "Locating nearest available ambulance...",
        ))
    }

    /// Steps to schedule after a successful trigger, in firing order.
    pub fn timeline(&self) -> Vec<ScheduledStep> {
        vec![
            ScheduledStep {
                after: Duration::from_millis(self.config.en_route_after_ms),
                step: TimelineStep::UnitEnRoute,
            },
            ScheduledStep {
                after: Duration::from_millis(self.config.eta_update_after_ms),
                step: TimelineStep::EtaRevised,
            },
            ScheduledStep {
                after: Duration::from_millis(self.config.arrival_after_ms),
                step: TimelineStep::UnitArrived,
            },
        ]
    }

    /// Apply a timer-driven step scheduled for `generation`.
    pub fn apply_step(&mut self, generation: u64, step: TimelineStep) -> StepOutcome {
        if generation != self.generation || self.status != step.expected_status() {
            tracing::debug!(
                ?step,
                generation,
                current_generation = self.generation,
                status = %self.status,
                "Stale timeline step ignored"
            );
            return StepOutcome::Ignored;
        }

        let notification = match step {
            TimelineStep::UnitEnRoute => {
                self.status = PatientStatus::OnWay;
                self.eta_minutes = Some(self.config.initial_eta_minutes);
                Some(Notification::new(
                    "Ambulance Dispatched",
                    format!(
                        "Unit {} is on the way. ETA: {} minutes",
                        self.config.unit_id, self.config.initial_eta_minutes
                    ),
                ))
            }
            TimelineStep::EtaRevised => {
                self.eta_minutes = Some(self.config.updated_eta_minutes);
                None
            }
            TimelineStep::UnitArrived => {
                self.status = PatientStatus::Arrived;
                self.eta_minutes = None;
                Some(Notification::new(
                    "Ambulance Arrived",
                    "Medical team is at your location",
                ))
            }
        };

        tracing::info!(
            ?step,
            status = %self.status,
            eta_minutes = ?self.eta_minutes,
            "Patient dispatch advanced"
        );
        StepOutcome::Applied(notification)
    }

    /// Close an arrived request and return to idle. No-op otherwise.
    pub fn close_request(&mut self) -> bool {
        if !self.can_close() {
            return false;
        }
        self.status = PatientStatus::Idle;
        self.eta_minutes = None;
        tracing::info!("Dispatch request closed");
        true
    }
}

impl Default for PatientDispatch {
    fn default() -> Self {
        Self::new(DispatchConfig::default())
    }
}
