//! The dashboard controller: all mutable UI state in one place
//!
//! The controller owns the config, the zone snapshot, the vehicle
//! marker dictionary, both forms, and the event log. It is the single
//! source of truth for what is displayed. Network flows run as spawned
//! tasks; their typed outcomes arrive over a channel and are applied
//! run-to-completion on the UI thread via [`apply_outcome`], so the
//! whole state machine is testable without a rendering surface.
//!
//! [`apply_outcome`]: DashboardController::apply_outcome

use crate::api::client::ApiClient;
use crate::api::types::Zone;
use crate::core::config::DashboardConfig;
use crate::core::geo::{LatLng, LatLngBounds};
use crate::prelude::HashMap;
use crate::ui::event_log::EventLog;
use crate::ui::flows::{
    spawn_config_load, spawn_location_submit, spawn_status_lookup, spawn_zone_load, FlowOutcome,
};
use crate::ui::forms::{LocationForm, StatusForm, StatusMessage};
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Zoom used when recentering on a freshly submitted location.
const SUBMIT_RECENTER_ZOOM: f64 = 13.0;

/// Padding in pixels when fitting the view to zones or markers.
pub const FIT_PADDING: f64 = 50.0;

/// A vehicle's last known position. Upsert-only; removed only by the
/// bulk clear action.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleMarker {
    pub position: LatLng,
    pub zone_name: Option<String>,
}

impl VehicleMarker {
    pub fn popup_text(&self, vehicle_id: &str) -> String {
        format!(
            "Vehicle: {}\nZone: {}\nLocation: {:.4}, {:.4}",
            vehicle_id,
            self.zone_name.as_deref().unwrap_or("None"),
            self.position.lat,
            self.position.lon,
        )
    }
}

/// A one-shot camera change for the map view to consume.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraRequest {
    View { center: LatLng, zoom: f64 },
    Fit(LatLngBounds),
}

pub struct DashboardController {
    pub config: DashboardConfig,
    pub zones: Vec<Zone>,
    pub zones_loaded: bool,
    pub zones_error: Option<String>,
    pub markers: HashMap<String, VehicleMarker>,
    pub event_log: EventLog,
    pub location_form: LocationForm,
    pub status_form: StatusForm,
    api: ApiClient,
    outcome_tx: Sender<FlowOutcome>,
    outcome_rx: Receiver<FlowOutcome>,
    pending_camera: Option<CameraRequest>,
    in_flight: usize,
}

impl DashboardController {
    pub fn new() -> Self {
        let config = DashboardConfig::default();
        let api = ApiClient::new(&config.api_base_url);
        let (outcome_tx, outcome_rx) = unbounded();
        Self {
            config,
            zones: Vec::new(),
            zones_loaded: false,
            zones_error: None,
            markers: HashMap::default(),
            event_log: EventLog::new(),
            location_form: LocationForm::default(),
            status_form: StatusForm::default(),
            api,
            outcome_tx,
            outcome_rx,
            pending_camera: None,
            in_flight: 0,
        }
    }

    /// Kicks off the startup sequence: config load, then map init and
    /// zone load once the config outcome arrives.
    pub fn start(&mut self, config_url: &str) {
        self.in_flight += 1;
        spawn_config_load(config_url.to_string(), self.outcome_tx.clone());
    }

    /// Drains completed flows. Call once per frame.
    pub fn poll(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply_outcome(outcome);
        }
    }

    /// Applies one flow outcome to the controller state.
    pub fn apply_outcome(&mut self, outcome: FlowOutcome) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match outcome {
            FlowOutcome::ConfigLoaded(result) => {
                match result {
                    Ok(remote) => self.config.apply(remote),
                    Err(e) => log::warn!("could not load config, using defaults: {e}"),
                }
                self.api = ApiClient::new(&self.config.api_base_url);
                self.pending_camera = Some(CameraRequest::View {
                    center: self.config.map_center,
                    zoom: self.config.map_zoom,
                });
                self.in_flight += 1;
                spawn_zone_load(self.api.clone(), self.outcome_tx.clone());
            }

            FlowOutcome::ZonesLoaded(result) => {
                self.zones_loaded = true;
                match result {
                    Ok(zones) => {
                        log::info!("loaded {} zones", zones.len());
                        self.zones = zones;
                        self.zones_error = None;
                    }
                    Err(e) => {
                        log::error!("error loading zones: {e}");
                        self.zones_error = Some("Error loading zones".to_string());
                    }
                }
            }

            FlowOutcome::LocationSubmitted { request, result } => match result {
                Ok(response) => {
                    let zone_text = match &response.zone_name {
                        Some(name) => format!("Current zone: {name}"),
                        None => "No zone".to_string(),
                    };
                    self.location_form.result = Some(StatusMessage::success(format!(
                        "Location submitted successfully. {zone_text}"
                    )));

                    if let Some(kind) = response.event {
                        self.event_log.push(
                            request.vehicle_id.clone(),
                            kind,
                            response.zone_name.clone(),
                        );
                    }

                    let position = LatLng::new(request.latitude, request.longitude);
                    self.markers.insert(
                        request.vehicle_id,
                        VehicleMarker {
                            position,
                            zone_name: response.zone_name,
                        },
                    );

                    self.pending_camera = Some(CameraRequest::View {
                        center: position,
                        zoom: SUBMIT_RECENTER_ZOOM,
                    });
                    self.location_form.clear_inputs();
                }
                Err(e) => {
                    self.location_form.result = Some(StatusMessage::error(format!("Error: {e}")));
                }
            },

            FlowOutcome::StatusFetched { result, .. } => match result {
                Ok(status) => {
                    self.status_form.status = Some(status);
                    self.status_form.result = None;
                }
                Err(e) => {
                    self.status_form.status = None;
                    self.status_form.result = Some(StatusMessage::error(format!("Error: {e}")));
                }
            },
        }
    }

    /// Validates the submission form and spawns the POST flow. A
    /// validation failure never issues a request.
    pub fn submit_location(&mut self) {
        match self.location_form.validate() {
            Ok(request) => {
                self.location_form.result = None;
                self.in_flight += 1;
                spawn_location_submit(self.api.clone(), request, self.outcome_tx.clone());
            }
            Err(e) => {
                self.location_form.result = Some(StatusMessage::error(e.to_string()));
            }
        }
    }

    /// Validates the lookup form and spawns the status flow.
    pub fn lookup_status(&mut self) {
        let vehicle_id = self.status_form.vehicle_id.trim().to_string();
        if vehicle_id.is_empty() {
            self.status_form.result =
                Some(StatusMessage::error("Please enter a vehicle ID".to_string()));
            return;
        }
        self.in_flight += 1;
        spawn_status_lookup(self.api.clone(), vehicle_id, self.outcome_tx.clone());
    }

    /// Removes every vehicle marker and resets the event log.
    pub fn clear_markers(&mut self) {
        self.markers.clear();
        self.event_log.clear();
    }

    /// Requests a camera fit over all zone centers, or over all markers
    /// when no zones exist. No-op when both are empty.
    pub fn fit_view(&mut self) {
        let bounds = if !self.zones.is_empty() {
            LatLngBounds::from_points(self.zones.iter().map(|z| z.center))
        } else {
            LatLngBounds::from_points(self.markers.values().map(|m| m.position))
        };
        if let Some(bounds) = bounds {
            self.pending_camera = Some(CameraRequest::Fit(bounds));
        }
    }

    /// Takes the pending camera change, if any.
    pub fn take_camera(&mut self) -> Option<CameraRequest> {
        self.pending_camera.take()
    }

    /// Number of flow outcomes queued but not yet applied.
    pub fn pending_outcomes(&self) -> usize {
        self.outcome_rx.len()
    }

    /// Whether any flow has been spawned but its outcome not yet
    /// applied. The frame loop keeps repainting while this holds, since
    /// outcomes land between input events.
    pub fn has_pending_flows(&self) -> bool {
        self.in_flight > 0
    }
}

impl Default for DashboardController {
    fn default() -> Self {
        Self::new()
    }
}
