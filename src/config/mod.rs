//! Configuration module for LifeLink
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`LIFELINK_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use lifelink::config::LifelinkConfig;
//!
//! let config = LifelinkConfig::default();
//! assert_eq!(config.dispatch.arrival_after_ms, 8000);
//!
//! let toml = r#"
//! [simulation]
//! damping = 0.03
//! "#;
//! let config: LifelinkConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.simulation.damping, 0.03);
//! ```

pub mod auth;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod map;
pub mod simulation;

pub use auth::AuthConfig;
pub use dispatch::DispatchConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use map::MapConfig;
pub use simulation::{SimulationConfig, MAX_TICK_INTERVAL_MS};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for every simulated surface.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LifelinkConfig {
    /// Vehicle movement tuning
    pub simulation: SimulationConfig,
    /// Patient-side dispatch timeline
    pub dispatch: DispatchConfig,
    /// Map tile layer
    pub map: MapConfig,
    /// Driver login
    pub auth: AuthConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl LifelinkConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var("LIFELINK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LIFELINK_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        if let Ok(token) = std::env::var("LIFELINK_MAP_TOKEN") {
            self.map.access_token = Some(token);
        }

        if let Ok(seed) = std::env::var("LIFELINK_SEED") {
            if let Ok(s) = seed.parse() {
                self.simulation.seed = Some(s);
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if !(sim.damping > 0.0 && sim.damping < 1.0) {
            return Err(invalid("simulation.damping", "must be between 0 and 1 (exclusive)"));
        }
        if !sim.jitter.is_finite() || sim.jitter < 0.0 {
            return Err(invalid("simulation.jitter", "must be a non-negative number"));
        }
        if sim.tick_interval_ms == 0 || sim.tick_interval_ms > MAX_TICK_INTERVAL_MS {
            return Err(invalid(
                "simulation.tick_interval_ms",
                "must be between 1 and 1000",
            ));
        }
        if !sim.eta_scale.is_finite() || sim.eta_scale <= 0.0 {
            return Err(invalid("simulation.eta_scale", "must be positive"));
        }

        let dispatch = &self.dispatch;
        if dispatch.unit_id.trim().is_empty() {
            return Err(invalid("dispatch.unit_id", "cannot be empty"));
        }
        if dispatch.eta_update_after_ms <= dispatch.en_route_after_ms {
            return Err(invalid(
                "dispatch.eta_update_after_ms",
                "must come after en_route_after_ms",
            ));
        }
        if dispatch.arrival_after_ms <= dispatch.eta_update_after_ms {
            return Err(invalid(
                "dispatch.arrival_after_ms",
                "must come after eta_update_after_ms",
            ));
        }

        if !(0.0..=22.0).contains(&self.map.zoom) {
            return Err(invalid("map.zoom", "must be between 0 and 22"));
        }
        if !(0.0..=85.0).contains(&self.map.pitch) {
            return Err(invalid("map.pitch", "must be between 0 and 85"));
        }

        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    }
}
