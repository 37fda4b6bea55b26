//! Reverse geocoding of the ISS sub-point

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::config::GeocoderConfig;

/// Maps a latitude/longitude pair to a structured address.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// `Ok(None)` when the service has nothing there (e.g. open ocean).
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<Value>>;
}

/// OpenStreetMap Nominatim `/reverse` client
pub struct NominatimGeocoder {
    client: Client,
    url: String,
    zoom: u8,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()
            .context("Failed to build geocoder HTTP client")?;

        Ok(Self {
            client,
            url: config.url.clone(),
            zoom: config.zoom,
        })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<Value>> {
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", latitude.to_string()),
                ("lon", wrap_longitude(longitude).to_string()),
                ("zoom", self.zoom.to_string()),
                ("accept-language", "en".to_string()),
            ])
            .send()
            .await
            .context("Failed to send reverse geocoding request")?;

        if !response.status().is_success() {
            anyhow::bail!("Geocoder returned HTTP {}", response.status());
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse reverse geocoding response")?;

        Ok(extract_address(body))
    }
}

/// Always answers "nothing here"; used when geocoding is turned off.
pub struct DisabledGeocoder;

#[async_trait]
impl ReverseGeocoder for DisabledGeocoder {
    async fn reverse(&self, _latitude: f64, _longitude: f64) -> Result<Option<Value>> {
        Ok(None)
    }
}

pub fn from_config(config: &GeocoderConfig) -> Result<Arc<dyn ReverseGeocoder>> {
    if config.enabled {
        Ok(Arc::new(NominatimGeocoder::new(config)?))
    } else {
        Ok(Arc::new(DisabledGeocoder))
    }
}

/// Look up a place name, giving up after `timeout`. Errors and timeouts
/// are logged and reported as `None`.
pub async fn locate(
    geocoder: &dyn ReverseGeocoder,
    latitude: f64,
    longitude: f64,
    timeout: Duration,
) -> Option<Value> {
    match tokio::time::timeout(timeout, geocoder.reverse(latitude, longitude)).await {
        Ok(Ok(found)) => found,
        Ok(Err(e)) => {
            tracing::warn!("Reverse geocoding failed for ({}, {}): {:#}", latitude, longitude, e);
            None
        }
        Err(_) => {
            tracing::warn!(
                "Reverse geocoding timed out after {:?} for ({}, {})",
                timeout,
                latitude,
                longitude
            );
            None
        }
    }
}

/// Nominatim answers `{"error": "Unable to geocode"}` when nothing is there.
fn extract_address(body: Value) -> Option<Value> {
    if body.get("error").is_some() {
        return None;
    }
    body.get("address").cloned()
}

/// Bring any longitude into [-180, 180] for the lookup query.
fn wrap_longitude(longitude: f64) -> f64 {
    let wrapped = (longitude + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && longitude > 0.0 { 180.0 } else { wrapped }
}
