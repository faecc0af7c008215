//! Simulated vehicle movement.
//!
//! Each tick nudges the vehicle a fixed fraction of the way toward its target
//! (`next = current + (target - current) * k`), optionally adds jitter, and
//! derives an ETA from the remaining straight-line distance.

mod history;

pub use history::{PositionHistory, HISTORY_CAPACITY};

use crate::config::SimulationConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// A longitude/latitude pair in plain degree space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lng: f64,
    pub lat: f64,
}

impl Coordinate {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Euclidean distance in degrees. Not a geodesic distance.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let dx = other.lng - self.lng;
        let dy = other.lat - self.lat;
        (dx * dx + dy * dy).sqrt()
    }

    /// Moves `fraction` of the way toward `target`.
    pub fn approach(&self, target: &Coordinate, fraction: f64) -> Coordinate {
        Coordinate {
            lng: self.lng + (target.lng - self.lng) * fraction,
            lat: self.lat + (target.lat - self.lat) * fraction,
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lng, self.lat)
    }
}

/// Convert a degree-space distance to whole minutes, never below 1.
pub fn eta_minutes(distance: f64, scale: f64) -> u32 {
    let minutes = (distance * scale).round();
    if minutes.is_finite() && minutes > 1.0 {
        minutes.min(u32::MAX as f64) as u32
    } else {
        1
    }
}

/// Outcome of one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationStep {
    pub position: Coordinate,
    pub distance: f64,
    pub eta_minutes: u32,
}

/// Moves a single vehicle toward its current target.
#[derive(Debug)]
pub struct PositionSimulator {
    position: Coordinate,
    target: Option<Coordinate>,
    history: PositionHistory,
    damping: f64,
    jitter: f64,
    eta_scale: f64,
    rng: StdRng,
}

impl PositionSimulator {
    /// Create a simulator parked at `start` with no target.
    pub fn new(start: Coordinate, config: &SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut history = PositionHistory::new();
        history.push(start);

        Self {
            position: start,
            target: None,
            history,
            damping: config.damping,
            jitter: config.jitter,
            eta_scale: config.eta_scale,
            rng,
        }
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn target(&self) -> Option<Coordinate> {
        self.target
    }

    pub fn history(&self) -> &PositionHistory {
        &self.history
    }

    /// Point the vehicle somewhere else, or park it with `None`.
    pub fn set_target(&mut self, target: Option<Coordinate>) {
        self.target = target;
    }

    /// Advance one tick. Returns `None` while parked.
    pub fn tick(&mut self) -> Option<SimulationStep> {
        let target = self.target?;

        let mut next = self.position.approach(&target, self.damping);
        if self.jitter > 0.0 {
            next.lng += self.rng.gen_range(-self.jitter..=self.jitter);
            next.lat += self.rng.gen_range(-self.jitter..=self.jitter);
        }

        self.position = next;
        self.history.push(next);

        let distance = next.distance_to(&target);
        Some(SimulationStep {
            position: next,
            distance,
            eta_minutes: eta_minutes(distance, self.eta_scale),
        })
    }

    /// Current ETA to target without moving.
    pub fn eta(&self) -> Option<u32> {
        self.target
            .map(|t| eta_minutes(self.position.distance_to(&t), self.eta_scale))
    }
}
