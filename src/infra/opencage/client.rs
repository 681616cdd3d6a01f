use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::services::geocoding::{Coordinates, Geocoder};
use sunny_score::fetch::{HttpClient, fetch_bytes};

pub const OPENCAGE_BASE_URL: &str = "https://api.opencagedata.com/geocode/v1/json";

#[derive(Deserialize)]
struct GeocodeResponse {
    results: Vec<GeocodeResult>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    lat: f64,
    lng: f64,
}

/// OpenCage forward geocoding.
///
/// The API key is expected to be injected by the client, typically with
/// [`sunny_score::fetch::auth::UrlParam`] under the `key` parameter.
pub struct OpenCageClient<C> {
    base_url: String,
    client: C,
}

impl<C: HttpClient> OpenCageClient<C> {
    pub fn new(client: C) -> Self {
        Self::with_base_url(client, OPENCAGE_BASE_URL)
    }

    pub fn with_base_url(client: C, base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            client,
        }
    }
}

#[async_trait]
impl<C: HttpClient> Geocoder for OpenCageClient<C> {
    #[tracing::instrument(skip(self))]
    async fn locate(&self, city: &str, province: &str) -> Result<Coordinates> {
        let query = format!("{city}, {province}");
        let url = reqwest::Url::parse_with_params(&self.base_url, &[("q", query.as_str())])
            .with_context(|| format!("Invalid geocoding base url '{}'", self.base_url))?;

        let body = fetch_bytes(&self.client, url.as_str())
            .await
            .context("Geocoding request failed")?;

        let response: GeocodeResponse =
            serde_json::from_slice(&body).context("Failed to parse geocoding response")?;
        debug!(results = response.results.len(), "Geocoding response received");

        let first = response.results.into_iter().next().ok_or_else(|| {
            anyhow!("Could not find location. Please check the city and province/state names.")
        })?;

        let coordinates = Coordinates {
            latitude: first.geometry.lat,
            longitude: first.geometry.lng,
        };
        info!(
            latitude = coordinates.latitude,
            longitude = coordinates.longitude,
            "Location resolved"
        );
        Ok(coordinates)
    }
}
