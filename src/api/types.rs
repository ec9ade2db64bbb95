//! Wire types for the geofencing API
//!
//! Request and response shapes are the contract this client relies on;
//! the zone membership computation behind them is entirely server-side.

use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// A server-defined circular geofence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub center: LatLng,
    pub radius_meters: f64,
}

/// Response body of `GET {api}/zones`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZoneListResponse {
    pub zones: Vec<Zone>,
}

/// Body of `POST {api}/location`. Coordinates are forwarded exactly as
/// entered; range validation happens server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRequest {
    pub vehicle_id: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Zone transition reported alongside a location submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneEventKind {
    Enter,
    Exit,
}

impl ZoneEventKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Enter => "Entered",
            Self::Exit => "Exited",
        }
    }
}

/// Successful response of `POST {api}/location`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LocationResponse {
    pub vehicle_id: Option<String>,
    pub current_zone: Option<String>,
    pub zone_name: Option<String>,
    pub event: Option<ZoneEventKind>,
}

/// Successful response of `GET {api}/vehicle/{id}/status`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VehicleStatus {
    pub vehicle_id: String,
    pub current_zone: Option<String>,
    #[serde(default)]
    pub zone_name: Option<String>,
    pub location_count: u64,
}

/// Structured error body carried by non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_list_deserialization() {
        let body = r#"{
            "zones": [
                {"id": "zone1", "name": "Downtown",
                 "center": {"lat": 37.7749, "lon": -122.4194},
                 "radius_meters": 1000.0}
            ]
        }"#;
        let parsed: ZoneListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.zones.len(), 1);
        assert_eq!(parsed.zones[0].id, "zone1");
        assert_eq!(parsed.zones[0].radius_meters, 1000.0);
    }

    #[test]
    fn test_event_kind_wire_form() {
        let enter: ZoneEventKind = serde_json::from_str(r#""enter""#).unwrap();
        let exit: ZoneEventKind = serde_json::from_str(r#""exit""#).unwrap();
        assert_eq!(enter, ZoneEventKind::Enter);
        assert_eq!(exit, ZoneEventKind::Exit);
        assert!(serde_json::from_str::<ZoneEventKind>(r#""re-enter""#).is_err());
    }

    #[test]
    fn test_location_response_without_event() {
        let body = r#"{"vehicle_id": "truck-7", "current_zone": null, "zone_name": null, "event": null}"#;
        let parsed: LocationResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.vehicle_id.as_deref(), Some("truck-7"));
        assert!(parsed.event.is_none());
        assert!(parsed.zone_name.is_none());
    }

    #[test]
    fn test_vehicle_status_defaults_zone_name() {
        let body = r#"{"vehicle_id": "truck-7", "current_zone": null, "location_count": 3}"#;
        let parsed: VehicleStatus = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.location_count, 3);
        assert!(parsed.zone_name.is_none());
    }

    #[test]
    fn test_location_request_serialization() {
        let request = LocationRequest {
            vehicle_id: "truck-7".to_string(),
            latitude: 37.7749,
            longitude: -122.4194,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["vehicle_id"], "truck-7");
        assert_eq!(json["latitude"], 37.7749);
        assert_eq!(json["longitude"], -122.4194);
    }
}
