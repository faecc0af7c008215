//! Shared test utilities for LifeLink integration tests.

#![allow(dead_code)]

use lifelink::config::{DispatchConfig, LifelinkConfig, SimulationConfig};
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// Config Builders
// =============================================================================

/// Simulation tuning with a fixed seed and no jitter.
pub fn seeded_simulation() -> SimulationConfig {
    SimulationConfig {
        seed: Some(42),
        ..SimulationConfig::default()
    }
}

/// A patient timeline compressed to tens of milliseconds.
pub fn fast_dispatch() -> DispatchConfig {
    DispatchConfig {
        en_route_after_ms: 20,
        eta_update_after_ms: 50,
        arrival_after_ms: 80,
        ..DispatchConfig::default()
    }
}

/// TOML for a config where every timer is short enough for CLI tests.
pub const FAST_CONFIG_TOML: &str = r#"
[simulation]
tick_interval_ms = 5
damping = 0.2
seed = 7

[dispatch]
en_route_after_ms = 20
eta_update_after_ms = 50
arrival_after_ms = 80

[auth]
latency_ms = 0

[logging]
level = "error"
"#;

/// Write [`FAST_CONFIG_TOML`] into a fresh temp dir.
///
/// Keep the returned `TempDir` alive for as long as the path is used.
pub fn write_fast_config() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lifelink.toml");
    std::fs::write(&path, FAST_CONFIG_TOML).unwrap();
    (dir, path)
}

/// Parse [`FAST_CONFIG_TOML`].
pub fn fast_config() -> LifelinkConfig {
    toml::from_str(FAST_CONFIG_TOML).unwrap()
}
