//! Patient SOS session.

use super::{publish, sleep_until_deadline, SessionError, COMMAND_CAPACITY, NOTIFICATION_CAPACITY};
use crate::config::DispatchConfig;
use crate::dispatch::{Notification, PatientDispatch, PatientStatus, StepOutcome, TimelineStep};
use serde::Serialize;
use std::collections::VecDeque;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};

/// Commands accepted by a patient session. Each reply reports whether the
/// control was enabled.
#[derive(Debug)]
pub enum PatientCommand {
    TriggerDispatch { reply: oneshot::Sender<bool> },
    CloseRequest { reply: oneshot::Sender<bool> },
}

/// Observable patient screen state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientSnapshot {
    pub status: PatientStatus,
    pub eta_minutes: Option<u32>,
    pub progress: Option<usize>,
    pub unit_id: String,
}

impl From<&PatientDispatch> for PatientSnapshot {
    fn from(machine: &PatientDispatch) -> Self {
        Self {
            status: machine.status(),
            eta_minutes: machine.eta_minutes(),
            progress: machine.progress(),
            unit_id: machine.unit_id().to_string(),
        }
    }
}

/// Handle to a running patient session.
pub struct PatientSession {
    commands: mpsc::Sender<PatientCommand>,
    snapshots: watch::Receiver<PatientSnapshot>,
    notifications: broadcast::Sender<Notification>,
    handle: JoinHandle<()>,
    cancel: CancellationToken,
    _guard: DropGuard,
}

impl PatientSession {
    /// Spawn the session task on the current runtime.
    pub fn spawn(config: DispatchConfig) -> Self {
        let machine = PatientDispatch::new(config);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(PatientSnapshot::from(&machine));
        let (notification_tx, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        let cancel = CancellationToken::new();

        let task = PatientTask {
            machine,
            commands: command_rx,
            snapshots: snapshot_tx,
            notifications: notification_tx.clone(),
            pending: VecDeque::new(),
        };
        let handle = tokio::spawn(task.run(cancel.clone()));

        Self {
            commands: command_tx,
            snapshots: snapshot_rx,
            notifications: notification_tx,
            handle,
            _guard: cancel.clone().drop_guard(),
            cancel,
        }
    }

    /// Press the SOS control. Returns false if it was disabled.
    pub async fn trigger_dispatch(&self) -> Result<bool, SessionError> {
        self.request(|reply| PatientCommand::TriggerDispatch { reply }).await
    }

    /// Press "Close Request". Returns false if it was disabled.
    pub async fn close_request(&self) -> Result<bool, SessionError> {
        self.request(|reply| PatientCommand::CloseRequest { reply }).await
    }

    pub fn snapshot(&self) -> PatientSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<PatientSnapshot> {
        self.snapshots.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    /// Cancel pending timers and wait for the task to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            tracing::warn!(error = %e, "Patient session task failed");
        }
    }

    async fn request(
        &self,
        command: impl FnOnce(oneshot::Sender<bool>) -> PatientCommand,
    ) -> Result<bool, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(command(reply_tx))
            .await
            .map_err(|_| SessionError::Closed)?;
        reply_rx.await.map_err(|_| SessionError::Closed)
    }
}

struct PatientTask {
    machine: PatientDispatch,
    commands: mpsc::Receiver<PatientCommand>,
    snapshots: watch::Sender<PatientSnapshot>,
    notifications: broadcast::Sender<Notification>,
    /// Scheduled steps in firing order, tagged with their dispatch generation
    pending: VecDeque<(Instant, u64, TimelineStep)>,
}

impl PatientTask {
    async fn run(mut self, cancel: CancellationToken) {
        tracing::debug!("Patient session started");

        loop {
            let next_deadline = self.pending.front().map(|(at, _, _)| *at);

            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(pending = self.pending.len(), "Patient session shutting down");
                    break;
                }
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                _ = sleep_until_deadline(next_deadline) => {
                    if let Some((_, generation, step)) = self.pending.pop_front() {
                        self.fire(generation, step);
                    }
                }
            }
        }
    }

    fn handle_command(&mut self, command: PatientCommand) {
        match command {
            PatientCommand::TriggerDispatch { reply } => {
                let accepted = match self.machine.trigger_dispatch() {
                    Some(notification) => {
                        self.schedule_timeline();
                        publish(&self.notifications, notification);
                        true
                    }
                    None => false,
                };
                self.publish_snapshot();
                let _ = reply.send(accepted);
            }
            PatientCommand::CloseRequest { reply } => {
                let accepted = self.machine.close_request();
                self.publish_snapshot();
                let _ = reply.send(accepted);
            }
        }
    }

    fn schedule_timeline(&mut self) {
        let start = Instant::now();
        let generation = self.machine.generation();

        self.pending.retain(|(_, g, _)| *g == generation);
        for scheduled in self.machine.timeline() {
            self.pending
                .push_back((start + scheduled.after, generation, scheduled.step));
        }
        self.pending.make_contiguous().sort_by_key(|(at, _, _)| *at);
    }

    fn fire(&mut self, generation: u64, step: TimelineStep) {
        if let StepOutcome::Applied(notification) = self.machine.apply_step(generation, step) {
            if let Some(notification) = notification {
                publish(&self.notifications, notification);
            }
            self.publish_snapshot();
        }
    }

    fn publish_snapshot(&self) {
        self.snapshots.send_replace(PatientSnapshot::from(&self.machine));
    }
}
