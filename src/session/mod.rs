//! Per-screen simulation sessions.
//!
//! A session is one spawned task that owns a state machine and every timer
//! driving it. Callers talk to it through a handle: commands go in over an
//! mpsc channel, snapshots come out on a `watch` channel and notifications on
//! a `broadcast` channel. Dropping the handle cancels the task and its timers.

mod driver;
mod patient;

pub use driver::{DriverCommand, DriverSession, DriverSnapshot};
pub use patient::{PatientCommand, PatientSession, PatientSnapshot};

use crate::dispatch::Notification;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::time::Instant;

/// Capacity of each session's notification channel.
const NOTIFICATION_CAPACITY: usize = 32;

/// Capacity of each session's command queue.
const COMMAND_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session has ended")]
    Closed,
}

/// Sleep until `deadline`, or forever when there is none.
async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}

/// Log and fan out a notification. Having no subscribers is fine.
fn publish(sender: &broadcast::Sender<Notification>, notification: Notification) {
    tracing::info!(
        title = %notification.title,
        description = %notification.description,
        "Notification"
    );
    let _ = sender.send(notification);
}
