//! Position simulator configuration

use serde::{Deserialize, Serialize};

/// Slowest accepted movement tick. There is no lower bound beyond zero, so
/// fast test configs may tick every few milliseconds.
pub const MAX_TICK_INTERVAL_MS: u64 = 1000;

/// Tuning for the vehicle position simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fraction of the remaining distance covered per tick, in (0, 1)
    pub damping: f64,
    /// Max uniform jitter added per axis per tick, in degrees (0 disables)
    pub jitter: f64,
    /// Milliseconds between ticks, in 1..=`MAX_TICK_INTERVAL_MS`
    pub tick_interval_ms: u64,
    /// Minutes of ETA per degree of remaining distance
    pub eta_scale: f64,
    /// Fixed RNG seed for reproducible jitter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            damping: 0.02,
            jitter: 0.0,
            tick_interval_ms: 1000,
            eta_scale: 500.0,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_config_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.damping, 0.02);
        assert_eq!(config.jitter, 0.0);
        assert_eq!(config.tick_interval_ms, 1000);
        assert_eq!(config.eta_scale, 500.0);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_simulation_config_partial_toml() {
        let config: SimulationConfig = toml::from_str("damping = 0.03\ntick_interval_ms = 100").unwrap();
        assert_eq!(config.damping, 0.03);
        assert_eq!(config.tick_interval_ms, 100);
        assert_eq!(config.eta_scale, 500.0);
    }
}
