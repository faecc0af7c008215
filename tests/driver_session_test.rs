//! Driver session flows: status controls, movement and handoff.

mod common;

use lifelink::config::MapConfig;
use lifelink::dispatch::{DriverControl, DriverDashboard, DriverStatus};
use lifelink::session::DriverSession;
use lifelink::simulation::HISTORY_CAPACITY;
use std::time::Duration;
use tokio::time::sleep;

fn spawn_session() -> DriverSession {
    DriverSession::spawn(
        DriverDashboard::default(),
        &common::seeded_simulation(),
        &MapConfig::default(),
    )
}

#[tokio::test(start_paused = true)]
async fn test_full_case_lifecycle() {
    let session = spawn_session();
    let mut notifications = session.subscribe();

    assert!(session.simulate_new_case().await.unwrap());
    let n = notifications.recv().await.unwrap();
    assert_eq!(n.title, "New Emergency Case");
    assert_eq!(n.description, "Critical case assigned. Review details below.");

    let expected = [
        (DriverControl::EnRoute, DriverStatus::EnRoute),
        (DriverControl::OnScene, DriverStatus::OnScene),
        (DriverControl::Transport, DriverStatus::Transporting),
    ];
    for (control, status) in expected {
        sleep(Duration::from_secs(2)).await;
        assert!(session.update_status(control).await.unwrap());
        assert_eq!(session.snapshot().status, status);
        assert_eq!(notifications.recv().await.unwrap().title, "Status Updated");
    }

    assert!(session.complete_handoff().await.unwrap());
    let n = notifications.recv().await.unwrap();
    assert_eq!(n.title, "Case Completed");

    let snapshot = session.snapshot();
    assert_eq!(snapshot.status, DriverStatus::Available);
    assert!(snapshot.case.is_none());
    assert!(snapshot.map.destination().is_none());
    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_out_of_order_controls_rejected() {
    let session = spawn_session();

    assert!(!session.update_status(DriverControl::OnScene).await.unwrap());
    assert!(!session.complete_handoff().await.unwrap());

    session.simulate_new_case().await.unwrap();
    assert!(!session.simulate_new_case().await.unwrap());
    assert!(!session.update_status(DriverControl::Transport).await.unwrap());
    assert!(!session.update_status(DriverControl::Available).await.unwrap());
    assert_eq!(session.snapshot().status, DriverStatus::Dispatched);

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_on_scene_only_enables_transport() {
    let session = spawn_session();
    session.simulate_new_case().await.unwrap();
    session.update_status(DriverControl::EnRoute).await.unwrap();
    session.update_status(DriverControl::OnScene).await.unwrap();

    let snapshot = session.snapshot();
    assert_eq!(snapshot.enabled_controls, vec![DriverControl::Transport]);
    assert!(!session.update_status(DriverControl::Available).await.unwrap());
    assert!(!session.update_status(DriverControl::EnRoute).await.unwrap());
    assert!(session.update_status(DriverControl::Transport).await.unwrap());

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_trail_is_bounded_and_eta_shrinks() {
    let session = spawn_session();
    session.simulate_new_case().await.unwrap();
    session.update_status(DriverControl::EnRoute).await.unwrap();

    let mut last_eta = session.snapshot().eta_minutes().unwrap();
    for _ in 0..6 {
        sleep(Duration::from_secs(15)).await;
        let snapshot = session.snapshot();
        let eta = snapshot.eta_minutes().unwrap();
        assert!(eta <= last_eta);
        assert!(eta >= 1);
        assert!(snapshot.trail.len() <= HISTORY_CAPACITY);
        last_eta = eta;
    }
    assert_eq!(session.snapshot().trail.len(), HISTORY_CAPACITY);

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_stops_movement() {
    let session = spawn_session();
    session.simulate_new_case().await.unwrap();
    session.update_status(DriverControl::EnRoute).await.unwrap();
    sleep(Duration::from_millis(2500)).await;

    let snapshots = session.watch();
    drop(session);
    sleep(Duration::from_millis(50)).await;
    let parked = snapshots.borrow().position;

    sleep(Duration::from_secs(10)).await;
    assert_eq!(snapshots.borrow().position, parked);
    assert!(snapshots.has_changed().is_err());
}
