//! Patient command implementation

use crate::cli::output::EventPrinter;
use crate::cli::setup::{load_config_with_overrides, CliOverrides};
use crate::cli::PatientArgs;
use crate::dispatch::{Notification, PatientStatus};
use crate::logging::init_tracing;
use crate::session::PatientSession;
use tokio::sync::broadcast;

/// Trigger an SOS, print every transition until the unit arrives, and
/// optionally close the request.
pub async fn run_patient(args: PatientArgs) -> Result<(), Box<dyn std::error::Error>> {
    let overrides = CliOverrides {
        log_level: args.log_level.as_deref(),
    };
    let config = load_config_with_overrides(&args.config, &overrides)?;
    init_tracing(&config.logging)?;
    tracing::debug!(?config, "Loaded configuration");

    let printer = EventPrinter::new(args.json);
    let session = PatientSession::spawn(config.dispatch.clone());
    let mut notifications = session.subscribe();
    let mut snapshots = session.watch();

    printer.patient(&session.snapshot())?;
    if !session.trigger_dispatch().await? {
        return Err("Emergency dispatch was not accepted".into());
    }

    loop {
        tokio::select! {
            biased;
            Ok(notification) = notifications.recv() => printer.notification(&notification)?,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    return Err("Patient session ended before the unit arrived".into());
                }
                let snapshot = snapshots.borrow_and_update().clone();
                printer.patient(&snapshot)?;
                if snapshot.status == PatientStatus::Arrived {
                    break;
                }
            }
        }
    }
    drain(&mut notifications, &printer)?;

    if args.close {
        if !session.close_request().await? {
            return Err("Request could not be closed".into());
        }
        printer.patient(&session.snapshot())?;
    }

    session.shutdown().await;
    Ok(())
}

/// Print notifications already published.
pub(crate) fn drain(
    notifications: &mut broadcast::Receiver<Notification>,
    printer: &EventPrinter,
) -> Result<(), serde_json::Error> {
    while let Ok(notification) = notifications.try_recv() {
        printer.notification(&notification)?;
    }
    Ok(())
}
