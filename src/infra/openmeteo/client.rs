use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::info;

use crate::services::geocoding::Coordinates;
use crate::services::weather_api::{DAILY_FIELDS, HOURLY_FIELDS, WeatherApi};
use sunny_score::fetch::{Fetcher, HttpClient};

pub const OPENMETEO_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Open-Meteo forecast API. Responses go through the injected [`Fetcher`],
/// so retries and caching follow whatever policy it was built with.
pub struct OpenMeteoClient<C> {
    base_url: String,
    fetcher: Fetcher<C>,
}

impl<C: HttpClient> OpenMeteoClient<C> {
    pub fn new(fetcher: Fetcher<C>) -> Self {
        Self::with_base_url(fetcher, OPENMETEO_BASE_URL)
    }

    pub fn with_base_url(fetcher: Fetcher<C>, base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            fetcher,
        }
    }

    fn forecast_url(
        &self,
        location: Coordinates,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<reqwest::Url> {
        let params = [
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("start_date", start.format("%Y-%m-%d").to_string()),
            ("end_date", end.format("%Y-%m-%d").to_string()),
            ("hourly", HOURLY_FIELDS.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
        ];
        reqwest::Url::parse_with_params(&self.base_url, &params)
            .with_context(|| format!("Invalid forecast base url '{}'", self.base_url))
    }
}

#[async_trait]
impl<C: HttpClient> WeatherApi for OpenMeteoClient<C> {
    #[tracing::instrument(skip(self), fields(lat = location.latitude, lon = location.longitude))]
    async fn forecast(
        &self,
        location: Coordinates,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<serde_json::Value> {
        let url = self.forecast_url(location, start, end)?;

        let body = self
            .fetcher
            .get(url.as_str())
            .await
            .context("Error fetching weather data")?;

        let payload: serde_json::Value =
            serde_json::from_slice(&body).context("Failed to parse weather response")?;
        info!(bytes = body.len(), "Weather data fetched");
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sunny_score::fetch::BasicClient;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn toronto() -> Coordinates {
        Coordinates {
            latitude: 43.65,
            longitude: -79.38,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_forecast_url_params() {
        let client = OpenMeteoClient::new(Fetcher::new(BasicClient::new().unwrap()));
        let url = client
            .forecast_url(toronto(), date("2024-06-01"), date("2024-06-07"))
            .unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(pairs.contains(&("start_date".into(), "2024-06-01".into())));
        assert!(pairs.contains(&("end_date".into(), "2024-06-07".into())));
        assert!(pairs.contains(&("timezone".into(), "auto".into())));
        assert!(pairs.contains(&("hourly".into(), HOURLY_FIELDS.into())));
        assert!(pairs.contains(&("daily".into(), DAILY_FIELDS.into())));
    }

    #[tokio::test]
    async fn test_forecast_returns_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "43.65"))
            .and(query_param("start_date", "2024-06-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "hourly": {"time": []},
                "daily": {"time": []}
            })))
            .mount(&server)
            .await;

        let client = OpenMeteoClient::with_base_url(
            Fetcher::new(BasicClient::new().unwrap()),
            &format!("{}/v1/forecast", server.uri()),
        );
        let payload = client
            .forecast(toronto(), date("2024-06-01"), date("2024-06-02"))
            .await
            .unwrap();

        assert!(payload["hourly"]["time"].is_array());
    }

    #[tokio::test]
    async fn test_forecast_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": true,
                "reason": "Parameter 'start_date' is out of allowed range"
            })))
            .mount(&server)
            .await;

        let client = OpenMeteoClient::with_base_url(
            Fetcher::new(BasicClient::new().unwrap()),
            &server.uri(),
        );
        let err = client
            .forecast(toronto(), date("1900-01-01"), date("1900-01-02"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Error fetching weather data"));
    }
}
