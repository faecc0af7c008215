//! Map tile layer configuration

use crate::simulation::Coordinate;
use serde::{Deserialize, Serialize};

/// Map layer settings.
///
/// `access_token` is the optional public tile-service credential. Without it
/// the synthetic map is used.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub style: String,
    pub default_center: Coordinate,
    pub zoom: f64,
    pub pitch: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            style: "navigation-night-v1".to_string(),
            default_center: Coordinate::new(-74.006, 40.7128),
            zoom: 14.0,
            pitch: 45.0,
        }
    }
}

// Token stays out of logs.
impl std::fmt::Debug for MapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapConfig")
            .field("access_token_present", &self.access_token.is_some())
            .field("style", &self.style)
            .field("default_center", &self.default_center)
            .field("zoom", &self.zoom)
            .field("pitch", &self.pitch)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_config_defaults() {
        let config = MapConfig::default();
        assert!(config.access_token.is_none());
        assert_eq!(config.style, "navigation-night-v1");
        assert_eq!(config.default_center, Coordinate::new(-74.006, 40.7128));
        assert_eq!(config.zoom, 14.0);
        assert_eq!(config.pitch, 45.0);
    }

    #[test]
    fn test_map_config_debug_redacts_token() {
        let config = MapConfig {
            access_token: Some("pk.secret-token".to_string()),
            ..MapConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("pk.secret-token"));
        assert!(debug.contains("access_token_present: true"));
    }
}
