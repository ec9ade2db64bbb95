//! Form state and validation for the two request flows
//!
//! Kept free of egui so validation rules and message lifecycles can be
//! tested without a rendering surface. Coordinates must parse as
//! numbers; range validation is server-side, so out-of-range values
//! are sent as-is.

use crate::api::types::{LocationRequest, VehicleStatus};
use crate::{DashboardError, Result};
use std::time::{Duration, Instant};

/// How long success/info messages stay visible. Errors persist.
pub const MESSAGE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Info,
    Error,
}

/// An inline result message shown under a form.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: MessageKind,
    shown_at: Instant,
}

impl StatusMessage {
    fn new(text: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            text: text.into(),
            kind,
            shown_at: Instant::now(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, MessageKind::Success)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, MessageKind::Info)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, MessageKind::Error)
    }

    /// Success and info messages expire after [`MESSAGE_TTL`].
    pub fn is_visible(&self) -> bool {
        self.kind == MessageKind::Error || self.shown_at.elapsed() < MESSAGE_TTL
    }

    #[cfg(test)]
    pub(crate) fn backdate(&mut self, by: Duration) {
        self.shown_at -= by;
    }
}

/// State of the location submission form.
#[derive(Debug, Clone, Default)]
pub struct LocationForm {
    pub vehicle_id: String,
    pub latitude: String,
    pub longitude: String,
    pub result: Option<StatusMessage>,
}

impl LocationForm {
    /// Validates the current inputs into a request body.
    pub fn validate(&self) -> Result<LocationRequest> {
        let vehicle_id = self.vehicle_id.trim();
        if vehicle_id.is_empty() {
            return Err(DashboardError::InvalidInput(
                "Please enter a vehicle ID".to_string(),
            ));
        }

        let latitude: f64 = self.latitude.trim().parse().map_err(|_| {
            DashboardError::InvalidInput("Latitude must be a number".to_string())
        })?;
        let longitude: f64 = self.longitude.trim().parse().map_err(|_| {
            DashboardError::InvalidInput("Longitude must be a number".to_string())
        })?;

        Ok(LocationRequest {
            vehicle_id: vehicle_id.to_string(),
            latitude,
            longitude,
        })
    }

    /// Resets the input fields (the result message stays).
    pub fn clear_inputs(&mut self) {
        self.vehicle_id.clear();
        self.latitude.clear();
        self.longitude.clear();
    }
}

/// State of the vehicle status lookup form.
#[derive(Debug, Clone, Default)]
pub struct StatusForm {
    pub vehicle_id: String,
    pub status: Option<VehicleStatus>,
    pub result: Option<StatusMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(id: &str, lat: &str, lon: &str) -> LocationForm {
        LocationForm {
            vehicle_id: id.to_string(),
            latitude: lat.to_string(),
            longitude: lon.to_string(),
            result: None,
        }
    }

    #[test]
    fn test_valid_submission() {
        let request = form("truck-7", "37.7749", "-122.4194").validate().unwrap();
        assert_eq!(request.vehicle_id, "truck-7");
        assert_eq!(request.latitude, 37.7749);
        assert_eq!(request.longitude, -122.4194);
    }

    #[test]
    fn test_empty_vehicle_id_is_rejected() {
        let err = form("   ", "37.0", "-122.0").validate().unwrap_err();
        assert_eq!(err.to_string(), "Please enter a vehicle ID");
    }

    #[test]
    fn test_unparseable_coordinates_are_rejected() {
        assert!(form("truck-7", "north", "-122.0").validate().is_err());
        assert!(form("truck-7", "37.0", "").validate().is_err());
    }

    #[test]
    fn test_out_of_range_coordinates_pass_through() {
        // Range validation is server-side; the client sends them as-is.
        let request = form("truck-7", "123.0", "400.0").validate().unwrap();
        assert_eq!(request.latitude, 123.0);
        assert_eq!(request.longitude, 400.0);
    }

    #[test]
    fn test_vehicle_id_is_trimmed() {
        let request = form("  truck-7  ", "1.0", "2.0").validate().unwrap();
        assert_eq!(request.vehicle_id, "truck-7");
    }

    #[test]
    fn test_message_visibility() {
        let mut success = StatusMessage::success("ok");
        assert!(success.is_visible());
        success.backdate(MESSAGE_TTL + Duration::from_secs(1));
        assert!(!success.is_visible());

        let mut error = StatusMessage::error("boom");
        error.backdate(MESSAGE_TTL * 10);
        assert!(error.is_visible());
    }

    #[test]
    fn test_clear_inputs_keeps_message() {
        let mut form = form("truck-7", "1.0", "2.0");
        form.result = Some(StatusMessage::success("done"));
        form.clear_inputs();
        assert!(form.vehicle_id.is_empty());
        assert!(form.latitude.is_empty());
        assert!(form.result.is_some());
    }
}
