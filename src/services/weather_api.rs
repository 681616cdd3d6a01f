//! Trait for retrieving hourly and daily weather for a location.

use anyhow::Result;
use chrono::NaiveDate;

use crate::services::geocoding::Coordinates;

/// Hourly series requested from the provider, in payload order.
pub const HOURLY_FIELDS: &str = "cloudcover,wind_speed_10m,precipitation,snowfall,relative_humidity_2m";

/// Daily aggregates requested from the provider.
pub const DAILY_FIELDS: &str = "precipitation_sum,precipitation_hours,cloudcover_mean";

/// Abstraction over a weather data provider (e.g., Open-Meteo).
#[async_trait::async_trait]
pub trait WeatherApi {
    /// Returns the raw JSON payload covering `start..=end` in the location's
    /// local time zone.
    async fn forecast(
        &self,
        location: Coordinates,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<serde_json::Value>;
}
