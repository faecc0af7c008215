//! Map layer selection and camera.
//!
//! A live tile layer is used only when a public access token is supplied at
//! runtime; otherwise the stylized synthetic grid is rendered instead.

use crate::config::MapConfig;
use crate::simulation::Coordinate;
use serde::Serialize;

/// Camera zoom after flying to a destination.
pub const DESTINATION_ZOOM: f64 = 15.0;
/// Camera pitch after flying to a destination.
pub const DESTINATION_PITCH: f64 = 60.0;

/// Where map tiles come from.
#[derive(Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum TileSource {
    Live {
        style_url: String,
        #[serde(skip)]
        access_token: String,
    },
    Synthetic,
}

impl std::fmt::Debug for TileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileSource::Live { style_url, .. } => f
                .debug_struct("Live")
                .field("style_url", style_url)
                .field("access_token", &"<redacted>")
                .finish(),
            TileSource::Synthetic => f.write_str("Synthetic"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapCamera {
    pub center: Coordinate,
    pub zoom: f64,
    pub pitch: f64,
}

/// Map state for one screen.
#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    source: TileSource,
    style: String,
    camera: MapCamera,
    destination: Option<Coordinate>,
}

impl MapView {
    pub fn from_config(config: &MapConfig) -> Self {
        let mut view = Self {
            source: TileSource::Synthetic,
            style: config.style.clone(),
            camera: MapCamera {
                center: config.default_center,
                zoom: config.zoom,
                pitch: config.pitch,
            },
            destination: None,
        };
        if let Some(token) = config.access_token.as_deref() {
            view.enable_live(token);
        }
        view
    }

    pub fn source(&self) -> &TileSource {
        &self.source
    }

    pub fn camera(&self) -> MapCamera {
        self.camera
    }

    pub fn destination(&self) -> Option<Coordinate> {
        self.destination
    }

    pub fn is_live(&self) -> bool {
        matches!(self.source, TileSource::Live { .. })
    }

    /// Switch to live tiles with a runtime-entered token.
    ///
    /// Blank tokens leave the synthetic map in place and return false.
    pub fn enable_live(&mut self, token: &str) -> bool {
        let token = token.trim();
        if token.is_empty() {
            return false;
        }
        self.source = TileSource::Live {
            style_url: format!("mapbox://styles/mapbox/{}", self.style),
            access_token: token.to_string(),
        };
        tracing::debug!("Live map tiles enabled");
        true
    }

    /// Mark a destination and fly the camera to it.
    pub fn set_destination(&mut self, destination: Coordinate) {
        self.destination = Some(destination);
        self.camera = MapCamera {
            center: destination,
            zoom: DESTINATION_ZOOM,
            pitch: DESTINATION_PITCH,
        };
    }

    pub fn clear_destination(&mut self) {
        self.destination = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_token_uses_synthetic_map() {
        let view = MapView::from_config(&MapConfig::default());
        assert!(!view.is_live());
        assert_eq!(view.source(), &TileSource::Synthetic);
        assert_eq!(view.camera().center, Coordinate::new(-74.006, 40.7128));
        assert_eq!(view.camera().zoom, 14.0);
        assert_eq!(view.camera().pitch, 45.0);
    }

    #[test]
    fn test_blank_token_counts_as_absent() {
        let config = MapConfig {
            access_token: Some("   ".to_string()),
            ..MapConfig::default()
        };
        let view = MapView::from_config(&config);
        assert!(!view.is_live());
    }

    #[test]
    fn test_token_enables_live_tiles() {
        let config = MapConfig {
            access_token: Some("pk.abc".to_string()),
            ..MapConfig::default()
        };
        let view = MapView::from_config(&config);
        assert!(view.is_live());
        match view.source() {
            TileSource::Live { style_url, access_token } => {
                assert_eq!(style_url, "mapbox://styles/mapbox/navigation-night-v1");
                assert_eq!(access_token, "pk.abc");
            }
            TileSource::Synthetic => panic!("Expected live tiles"),
        }
    }

    #[test]
    fn test_runtime_token_entry() {
        let mut view = MapView::from_config(&MapConfig::default());
        assert!(!view.enable_live(""));
        assert!(view.enable_live("pk.runtime"));
        assert!(view.is_live());
    }

    #[test]
    fn test_set_destination_flies_camera() {
        let mut view = MapView::from_config(&MapConfig::default());
        let dest = Coordinate::new(-73.99, 40.73);
        view.set_destination(dest);

        assert_eq!(view.destination(), Some(dest));
        assert_eq!(view.camera().center, dest);
        assert_eq!(view.camera().zoom, DESTINATION_ZOOM);
        assert_eq!(view.camera().pitch, DESTINATION_PITCH);
    }

    #[test]
    fn test_debug_and_json_hide_token() {
        let mut view = MapView::from_config(&MapConfig::default());
        view.enable_live("pk.secret");

        assert!(!format!("{:?}", view).contains("pk.secret"));
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("pk.secret"));
        assert!(json.contains("\"mode\":\"live\""));
    }
}
