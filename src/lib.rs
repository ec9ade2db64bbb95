//! # fencewatch
//!
//! A native geofence fleet dashboard built on egui.
//!
//! The library provides the pieces the `fencewatch-app` binary wires
//! together: geographic primitives, the typed client for the remote
//! geofencing API, a slippy-map view widget with zone and vehicle
//! overlays, and the dashboard controller that owns all mutable state.

pub mod api;
pub mod core;
pub mod map;
pub mod prelude;
pub mod ui;

// Re-export public API
pub use crate::core::{
    config::{DashboardConfig, RemoteConfig},
    geo::{LatLng, LatLngBounds},
};

pub use crate::api::{
    client::ApiClient,
    types::{LocationRequest, LocationResponse, VehicleStatus, Zone, ZoneEventKind},
};

pub use crate::map::{view::MapView, viewport::Viewport};

pub use crate::ui::controller::DashboardController;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Structured error body returned by the geofencing service with a
    /// non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    InvalidInput(String),
}

/// Error type alias for convenience
pub type Error = DashboardError;
