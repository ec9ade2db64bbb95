//! Runtime configuration for the dashboard
//!
//! The dashboard starts from hardcoded defaults and fetches a partial
//! configuration from the service once at startup. Any field present in
//! the response overwrites its default; absent fields keep the default.
//! A failed or malformed fetch leaves the defaults untouched.

use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_MAP_CENTER: LatLng = LatLng {
    lat: 37.7749,
    lon: -122.4194,
};
pub const DEFAULT_MAP_ZOOM: f64 = 12.0;

/// Effective dashboard configuration, consumed by every network call
/// and the initial map view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub api_base_url: String,
    pub map_center: LatLng,
    pub map_zoom: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            map_center: DEFAULT_MAP_CENTER,
            map_zoom: DEFAULT_MAP_ZOOM,
        }
    }
}

impl DashboardConfig {
    /// Merges a partial remote payload over this configuration.
    pub fn apply(&mut self, remote: RemoteConfig) {
        if let Some(api_base_url) = remote.api_base_url {
            self.api_base_url = api_base_url;
        }
        if let Some(map_center) = remote.map_center {
            self.map_center = map_center;
        }
        if let Some(map_zoom) = remote.map_zoom {
            self.map_zoom = map_zoom;
        }
    }
}

/// Partial configuration as served by `GET /config`. Every field is
/// optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoteConfig {
    pub api_base_url: Option<String>,
    pub map_center: Option<LatLng>,
    pub map_zoom: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.map_center, LatLng::new(37.7749, -122.4194));
        assert_eq!(config.map_zoom, 12.0);
    }

    #[test]
    fn test_apply_overwrites_present_fields() {
        let mut config = DashboardConfig::default();
        config.apply(RemoteConfig {
            api_base_url: Some("http://fleet.example:8080".to_string()),
            map_center: Some(LatLng::new(51.5074, -0.1278)),
            map_zoom: Some(10.0),
        });

        assert_eq!(config.api_base_url, "http://fleet.example:8080");
        assert_eq!(config.map_center, LatLng::new(51.5074, -0.1278));
        assert_eq!(config.map_zoom, 10.0);
    }

    #[test]
    fn test_missing_zoom_keeps_default() {
        let remote: RemoteConfig =
            serde_json::from_str(r#"{"map_center": {"lat": 40.7128, "lon": -74.0060}}"#).unwrap();

        let mut config = DashboardConfig::default();
        config.apply(remote);

        assert_eq!(config.map_center, LatLng::new(40.7128, -74.0060));
        assert_eq!(config.map_zoom, DEFAULT_MAP_ZOOM);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_empty_payload_is_a_no_op() {
        let mut config = DashboardConfig::default();
        config.apply(RemoteConfig::default());
        assert_eq!(config, DashboardConfig::default());
    }
}
