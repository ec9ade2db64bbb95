//! Async client for the geofencing HTTP API
//!
//! All calls are single-shot: no retry, no deduplication. Transport
//! failures surface as [`DashboardError::Network`]; non-2xx responses are
//! parsed for their structured `{"error": ...}` body and surface as
//! [`DashboardError::Api`].

use crate::api::types::{
    ApiErrorBody, LocationRequest, LocationResponse, VehicleStatus, Zone, ZoneListResponse,
};
use crate::core::config::RemoteConfig;
use crate::{DashboardError, Result};
use once_cell::sync::Lazy;
use reqwest::{Client, Response};

/// Shared async HTTP client with a custom User-Agent. Building the
/// client once avoids TLS and connection pool setup per request.
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent("fencewatch/0.1 (+https://github.com/example/fencewatch)")
        .build()
        .expect("failed to build reqwest client")
});

/// Fetches the partial runtime configuration. Issued once at startup,
/// before any [`ApiClient`] exists, against the bootstrap config URL.
pub async fn fetch_config(config_url: &str) -> Result<RemoteConfig> {
    let response = HTTP_CLIENT.get(config_url).send().await?;
    let config = check(response).await?.json::<RemoteConfig>().await?;
    Ok(config)
}

/// Client bound to a base URL. Cheap to clone; the underlying
/// `reqwest::Client` is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {api}/zones`: the full zone snapshot.
    pub async fn fetch_zones(&self) -> Result<Vec<Zone>> {
        let url = format!("{}/zones", self.base_url);
        let response = HTTP_CLIENT.get(&url).send().await?;
        let body = check(response).await?.json::<ZoneListResponse>().await?;
        log::debug!("loaded {} zones from {}", body.zones.len(), url);
        Ok(body.zones)
    }

    /// `POST {api}/location`: submit a vehicle position.
    pub async fn submit_location(&self, request: &LocationRequest) -> Result<LocationResponse> {
        let url = format!("{}/location", self.base_url);
        let response = HTTP_CLIENT.post(&url).json(request).send().await?;
        let body = check(response).await?.json::<LocationResponse>().await?;
        Ok(body)
    }

    /// `GET {api}/vehicle/{id}/status`: current zone and update count.
    pub async fn vehicle_status(&self, vehicle_id: &str) -> Result<VehicleStatus> {
        let url = format!("{}/vehicle/{}/status", self.base_url, vehicle_id);
        let response = HTTP_CLIENT.get(&url).send().await?;
        let status = check(response).await?.json::<VehicleStatus>().await?;
        Ok(status)
    }
}

/// Turns a non-2xx response into `DashboardError::Api`, preferring the
/// server's `error` field over a bare status line.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ApiErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => format!("HTTP {status}"),
    };
    log::warn!("request failed with {status}: {message}");

    Err(DashboardError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_stripped() {
        let client = ApiClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");

        let client = ApiClient::new("http://localhost:5000");
        assert_eq!(client.base_url(), "http://localhost:5000");
    }
}
