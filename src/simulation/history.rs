//! Position trail ring buffer
//!
//! Keeps the last 20 simulated positions of a vehicle for trail rendering.

use std::collections::VecDeque;

use super::Coordinate;

/// Maximum number of trail points kept per vehicle.
pub const HISTORY_CAPACITY: usize = 20;

/// Ring buffer of recent positions (max 20 entries, oldest evicted first)
#[derive(Debug, Clone)]
pub struct PositionHistory {
    entries: VecDeque<Coordinate>,
    capacity: usize,
}

impl PositionHistory {
    /// Creates an empty history with the fixed trail capacity
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY),
            capacity: HISTORY_CAPACITY,
        }
    }

    /// Adds a position, evicting the oldest one if at capacity
    pub fn push(&mut self, position: Coordinate) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(position);
    }

    /// Returns all positions in chronological order (oldest first)
    pub fn get_all(&self) -> Vec<Coordinate> {
        self.entries.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PositionHistory {
    fn default() -> Self {
        Self::new()
    }
}
