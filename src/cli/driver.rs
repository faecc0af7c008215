//! Driver command implementation

use crate::auth::login;
use crate::cli::output::EventPrinter;
use crate::cli::patient::drain;
use crate::cli::setup::{load_config_with_overrides, CliOverrides};
use crate::cli::DriverArgs;
use crate::dispatch::{DriverControl, DriverDashboard, DriverStatus};
use crate::logging::init_tracing;
use crate::session::{DriverSession, SessionError};
use std::time::Duration;

/// Sign in, take the demo case and work it through handoff, pausing
/// `step_ms` between controls so the vehicle has time to move.
pub async fn run_driver(args: DriverArgs) -> Result<(), Box<dyn std::error::Error>> {
    let overrides = CliOverrides {
        log_level: args.log_level.as_deref(),
    };
    let config = load_config_with_overrides(&args.config, &overrides)?;
    init_tracing(&config.logging)?;
    tracing::debug!(?config, "Loaded configuration");

    let printer = EventPrinter::new(args.json);
    let signed_in = login(&config.auth, &args.driver_id, &args.password).await?;
    printer.notification(&signed_in.notification)?;

    let dashboard = DriverDashboard::new(
        config.dispatch.unit_id.clone(),
        signed_in.driver_id.to_string(),
    );
    let session = DriverSession::spawn(dashboard, &config.simulation, &config.map);
    let mut notifications = session.subscribe();

    if let Some(token) = &args.map_token {
        if !session.enable_live_map(token.as_str()).await? {
            tracing::warn!("Blank map token ignored; using synthetic tiles");
        }
    }
    let step = Duration::from_millis(args.step_ms);

    printer.driver(&session.snapshot())?;
    require(session.simulate_new_case().await, "Simulate New Case")?;
    drain(&mut notifications, &printer)?;
    printer.driver(&session.snapshot())?;

    for control in [DriverControl::EnRoute, DriverControl::OnScene, DriverControl::Transport] {
        pause(&session, &printer, step).await?;
        require(session.update_status(control).await, control.label())?;
        drain(&mut notifications, &printer)?;
        printer.driver(&session.snapshot())?;
    }

    pause(&session, &printer, step).await?;
    require(session.complete_handoff().await, "Complete Handoff")?;
    drain(&mut notifications, &printer)?;
    printer.driver(&session.snapshot())?;

    session.shutdown().await;
    Ok(())
}

/// Wait one step, reporting progress if the vehicle is moving.
async fn pause(
    session: &DriverSession,
    printer: &EventPrinter,
    step: Duration,
) -> Result<(), serde_json::Error> {
    tokio::time::sleep(step).await;
    let snapshot = session.snapshot();
    if matches!(
        snapshot.status,
        DriverStatus::EnRoute | DriverStatus::Transporting
    ) {
        printer.driver(&snapshot)?;
    }
    Ok(())
}

fn require(
    result: Result<bool, SessionError>,
    control: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if result? {
        Ok(())
    } else {
        Err(format!("Control '{}' is not available right now", control).into())
    }
}
