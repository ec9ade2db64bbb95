//! Prelude module for common fencewatch types and traits
//!
//! Re-exports the most commonly used types for easy importing with
//! `use fencewatch::prelude::*;`

pub use crate::core::{
    config::{DashboardConfig, RemoteConfig},
    geo::{LatLng, LatLngBounds},
};

pub use crate::api::{
    client::ApiClient,
    types::{LocationRequest, LocationResponse, VehicleStatus, Zone, ZoneEventKind},
};

pub use crate::map::{
    tiles::{TileCache, TileCoord, TileLoader, TileSource},
    view::MapView,
    viewport::Viewport,
};

pub use crate::ui::{
    controller::{CameraRequest, DashboardController, VehicleMarker},
    event_log::{EventLog, LogEntry},
    flows::FlowOutcome,
    forms::{LocationForm, MessageKind, StatusForm, StatusMessage},
};

pub use crate::{Error as DashboardError, Result};

pub use std::{
    sync::Arc,
    time::{Duration, Instant},
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
