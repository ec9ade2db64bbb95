//! Fire-and-forget request flows
//!
//! Each flow is one spawned task that performs a single request and
//! reports exactly one typed [`FlowOutcome`] back over a channel. The
//! controller drains that channel on the UI thread; nothing here mutates
//! shared state. No flow is cancelable or retried, and no ordering is
//! guaranteed across flows.

use crate::api::client::{self, ApiClient};
use crate::api::types::{LocationRequest, LocationResponse, VehicleStatus, Zone};
use crate::core::config::RemoteConfig;
use crate::Result;
use crossbeam_channel::Sender;

/// The result of one completed flow.
#[derive(Debug)]
pub enum FlowOutcome {
    ConfigLoaded(Result<RemoteConfig>),
    ZonesLoaded(Result<Vec<Zone>>),
    LocationSubmitted {
        request: LocationRequest,
        result: Result<LocationResponse>,
    },
    StatusFetched {
        vehicle_id: String,
        result: Result<VehicleStatus>,
    },
}

pub fn spawn_config_load(config_url: String, tx: Sender<FlowOutcome>) {
    tokio::spawn(async move {
        let result = client::fetch_config(&config_url).await;
        let _ = tx.send(FlowOutcome::ConfigLoaded(result));
    });
}

pub fn spawn_zone_load(api: ApiClient, tx: Sender<FlowOutcome>) {
    tokio::spawn(async move {
        let result = api.fetch_zones().await;
        let _ = tx.send(FlowOutcome::ZonesLoaded(result));
    });
}

pub fn spawn_location_submit(api: ApiClient, request: LocationRequest, tx: Sender<FlowOutcome>) {
    tokio::spawn(async move {
        let result = api.submit_location(&request).await;
        let _ = tx.send(FlowOutcome::LocationSubmitted { request, result });
    });
}

pub fn spawn_status_lookup(api: ApiClient, vehicle_id: String, tx: Sender<FlowOutcome>) {
    tokio::spawn(async move {
        let result = api.vehicle_status(&vehicle_id).await;
        let _ = tx.send(FlowOutcome::StatusFetched { vehicle_id, result });
    });
}
