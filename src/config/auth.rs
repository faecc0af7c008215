//! Driver login configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Simulated sign-in latency in milliseconds
    pub latency_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { latency_ms: 1500 }
    }
}
