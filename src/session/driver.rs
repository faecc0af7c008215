//! Driver in-cab session: status machine plus simulated vehicle movement.

use super::{publish, SessionError, COMMAND_CAPACITY, NOTIFICATION_CAPACITY};
use crate::config::{MapConfig, SimulationConfig};
use crate::dispatch::{
    DispatchCase, DriverControl, DriverDashboard, DriverStatus, Notification,
};
use crate::map::MapView;
use crate::simulation::{Coordinate, PositionSimulator};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

/// Commands accepted by a driver session. Each reply reports whether the
/// control was enabled.
#[derive(Debug)]
pub enum DriverCommand {
    SimulateNewCase {
        reply: oneshot::Sender<bool>,
    },
    UpdateStatus {
        control: DriverControl,
        reply: oneshot::Sender<bool>,
    },
    CompleteHandoff {
        reply: oneshot::Sender<bool>,
    },
    EnableLiveMap {
        token: String,
        reply: oneshot::Sender<bool>,
    },
}

/// Observable driver screen state.
#[derive(Debug, Clone, Serialize)]
pub struct DriverSnapshot {
    pub unit_id: String,
    pub driver_name: String,
    pub status: DriverStatus,
    pub case: Option<DispatchCase>,
    pub enabled_controls: Vec<DriverControl>,
    pub can_complete_handoff: bool,
    pub position: Coordinate,
    pub trail: Vec<Coordinate>,
    pub map: MapView,
}

impl DriverSnapshot {
    pub fn eta_minutes(&self) -> Option<u32> {
        self.case.as_ref().map(|c| c.eta_minutes)
    }
}

/// Handle to a running driver session.
pub struct DriverSession {
    commands: mpsc::Sender<DriverCommand>,
    snapshots: watch::Receiver<DriverSnapshot>,
    notifications: broadcast::Sender<Notification>,
    handle: JoinHandle<()>,
    cancel: CancellationToken,
    _guard: DropGuard,
}

impl DriverSession {
    /// Spawn a session for `dashboard`, parked at the map's default center.
    pub fn spawn(
        dashboard: DriverDashboard,
        simulation: &SimulationConfig,
        map: &MapConfig,
    ) -> Self {
        let map_view = MapView::from_config(map);
        let simulator = PositionSimulator::new(map.default_center, simulation);

        let task = DriverTask {
            dashboard,
            simulator,
            map: map_view,
            tick_interval: Duration::from_millis(simulation.tick_interval_ms),
        };

        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(task.snapshot());
        let (notification_tx, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(task.run(
            command_rx,
            snapshot_tx,
            notification_tx.clone(),
            cancel.clone(),
        ));

        Self {
            commands: command_tx,
            snapshots: snapshot_rx,
            notifications: notification_tx,
            handle,
            _guard: cancel.clone().drop_guard(),
            cancel,
        }
    }

    /// Press "Simulate New Case". Returns false if it was disabled.
    pub async fn simulate_new_case(&self) -> Result<bool, SessionError> {
        self.request(|reply| DriverCommand::SimulateNewCase { reply })
            .await
    }

    /// Press a quick-status control. Returns false if it was disabled.
    pub async fn update_status(&self, control: DriverControl) -> Result<bool, SessionError> {
        self.request(|reply| DriverCommand::UpdateStatus { control, reply })
            .await
    }

    /// Press "Complete Handoff". Returns false if it was disabled.
    pub async fn complete_handoff(&self) -> Result<bool, SessionError> {
        self.request(|reply| DriverCommand::CompleteHandoff { reply })
            .await
    }

    /// Enter a map token at runtime. Returns false for a blank token.
    pub async fn enable_live_map(&self, token: impl Into<String>) -> Result<bool, SessionError> {
        let token = token.into();
        self.request(|reply| DriverCommand::EnableLiveMap { token, reply })
            .await
    }

    pub fn snapshot(&self) -> DriverSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<DriverSnapshot> {
        self.snapshots.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    /// Stop the movement timer and wait for the task to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            tracing::warn!(error = %e, "Driver session task failed");
        }
    }

    async fn request(
        &self,
        command: impl FnOnce(oneshot::Sender<bool>) -> DriverCommand,
    ) -> Result<bool, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(command(reply_tx))
            .await
            .map_err(|_| SessionError::Closed)?;
        reply_rx.await.map_err(|_| SessionError::Closed)
    }
}

struct DriverTask {
    dashboard: DriverDashboard,
    simulator: PositionSimulator,
    map: MapView,
    tick_interval: Duration,
}

impl DriverTask {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<DriverCommand>,
        snapshots: watch::Sender<DriverSnapshot>,
        notifications: broadcast::Sender<Notification>,
        cancel: CancellationToken,
    ) {
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        tracing::debug!(
            unit_id = %self.dashboard.unit_id(),
            tick_interval_ms = self.tick_interval.as_millis() as u64,
            "Driver session started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("Driver session shutting down");
                    break;
                }
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    let (reply, accepted) = self.handle_command(command, &notifications);
                    snapshots.send_replace(self.snapshot());
                    let _ = reply.send(accepted);
                }
                _ = interval.tick() => {
                    if self.tick() {
                        snapshots.send_replace(self.snapshot());
                    }
                }
            }
        }
    }

    /// Apply a command and publish its notification. The reply is handed
    /// back so it goes out after the snapshot.
    fn handle_command(
        &mut self,
        command: DriverCommand,
        notifications: &broadcast::Sender<Notification>,
    ) -> (oneshot::Sender<bool>, bool) {
        let (notification, reply) = match command {
            DriverCommand::SimulateNewCase { reply } => (self.dashboard.simulate_new_case(), reply),
            DriverCommand::UpdateStatus { control, reply } => {
                (self.dashboard.update_status(control), reply)
            }
            DriverCommand::CompleteHandoff { reply } => (self.dashboard.complete_handoff(), reply),
            DriverCommand::EnableLiveMap { token, reply } => {
                return (reply, self.map.enable_live(&token));
            }
        };

        match notification {
            Some(notification) => {
                self.retarget();
                publish(notifications, notification);
                (reply, true)
            }
            None => (reply, false),
        }
    }

    /// Aim the simulator at wherever the current status says to drive.
    fn retarget(&mut self) {
        let target = match (self.dashboard.status(), self.dashboard.case()) {
            (DriverStatus::EnRoute, Some(case)) => Some(case.location),
            (DriverStatus::Transporting, Some(case)) => Some(case.hospital_location),
            _ => None,
        };

        self.simulator.set_target(target);
        match target {
            Some(destination) => {
                self.map.set_destination(destination);
                tracing::debug!(%destination, "Navigation target set");
            }
            None => self.map.clear_destination(),
        }
    }

    /// One movement step. Returns true if anything moved.
    fn tick(&mut self) -> bool {
        let Some(step) = self.simulator.tick() else {
            return false;
        };
        self.dashboard.set_eta(step.eta_minutes);

        tracing::trace!(
            position = %step.position,
            distance = step.distance,
            eta_minutes = step.eta_minutes,
            "Vehicle moved"
        );
        true
    }

    fn snapshot(&self) -> DriverSnapshot {
        DriverSnapshot {
            unit_id: self.dashboard.unit_id().to_string(),
            driver_name: self.dashboard.driver_name().to_string(),
            status: self.dashboard.status(),
            case: self.dashboard.case().cloned(),
            enabled_controls: self.dashboard.enabled_controls(),
            can_complete_handoff: self.dashboard.can_complete_handoff(),
            position: self.simulator.position(),
            trail: self.simulator.history().get_all(),
            map: self.map.clone(),
        }
    }
}
