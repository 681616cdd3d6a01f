//! Data types used by the scoring pipeline.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// A single hourly observation from the weather provider.
///
/// Readings are `None` when the provider sent `null` or omitted the series.
/// The timestamp is local to the location; it is never shifted to UTC.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRecord {
    pub timestamp: NaiveDateTime,
    pub cloud_cover_pct: Option<f64>,
    pub wind_speed_10m: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub snowfall_mm: Option<f64>,
    pub relative_humidity_pct: Option<f64>,
}

impl HourlyRecord {
    /// Calendar date of the observation in the provider's local time.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// A daily aggregate computed by the provider itself.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyProviderRecord {
    pub date: NaiveDate,
    pub precipitation_sum_mm: Option<f64>,
    pub precipitation_hours: Option<f64>,
    pub cloudcover_mean_pct: Option<f64>,
}

/// Both sections of a provider payload, already decoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherPayload {
    pub hourly: Vec<HourlyRecord>,
    pub daily: Vec<DailyProviderRecord>,
}

/// Reduction of one calendar day of hourly observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    #[serde(rename = "time")]
    pub date: NaiveDate,
    #[serde(rename = "Clear skies % of day")]
    pub clear_sky_pct: f64,
    #[serde(rename = "Avg wind speed")]
    pub avg_wind_speed: f64,
    #[serde(rename = "Windy hours %", skip_serializing_if = "Option::is_none")]
    pub windy_hours_pct: Option<f64>,
    #[serde(rename = "Humidity %", skip_serializing_if = "Option::is_none")]
    pub humidity_pct: Option<f64>,
    #[serde(rename = "Rain Quantity")]
    pub rain_quantity_mm: f64,
    #[serde(rename = "Snow Quantity")]
    pub snow_quantity_mm: f64,
}

/// The four components of the Always Sunny Score and the score itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub clear_skies_score: f64,
    pub wind_penalty: f64,
    pub rain_penalty: f64,
    pub snow_penalty: f64,
    pub always_sunny_score: f64,
}

/// A daily summary joined with the provider's record for the same date and
/// annotated with its score breakdown.
///
/// Field order is the serialized column order; `always_sunny_score` stays last.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDay {
    #[serde(rename = "time")]
    pub date: NaiveDate,
    #[serde(rename = "Clear skies % of day")]
    pub clear_sky_pct: f64,
    #[serde(rename = "Avg wind speed")]
    pub avg_wind_speed: f64,
    #[serde(rename = "Windy hours %", skip_serializing_if = "Option::is_none")]
    pub windy_hours_pct: Option<f64>,
    #[serde(rename = "Humidity %", skip_serializing_if = "Option::is_none")]
    pub humidity_pct: Option<f64>,
    #[serde(rename = "Rain Quantity")]
    pub rain_quantity_mm: f64,
    #[serde(rename = "Snow Quantity")]
    pub snow_quantity_mm: f64,

    // provider daily fields, null when no record was merged
    pub precipitation_sum: Option<f64>,
    pub precipitation_hours: Option<f64>,
    pub cloudcover_mean: Option<f64>,

    #[serde(rename = "Clear Skies Score")]
    pub clear_skies_score: f64,
    #[serde(rename = "Wind Penalty")]
    pub wind_penalty: f64,
    #[serde(rename = "Rain Penalty")]
    pub rain_penalty: f64,
    #[serde(rename = "Snow Penalty")]
    pub snow_penalty: f64,
    #[serde(rename = "Always Sunny Score")]
    pub always_sunny_score: f64,
}

impl ScoredDay {
    pub fn breakdown(&self) -> ScoreBreakdown {
        ScoreBreakdown {
            clear_skies_score: self.clear_skies_score,
            wind_penalty: self.wind_penalty,
            rain_penalty: self.rain_penalty,
            snow_penalty: self.snow_penalty,
            always_sunny_score: self.always_sunny_score,
        }
    }
}

/// Means of the headline daily figures across the whole date range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeMeans {
    pub clear_skies: f64,
    pub wind_speed: f64,
    pub rain_amount: f64,
    pub snow_amount: f64,
    pub sunny_score: f64,
}

/// What a pipeline run hands back, shaped by [`super::config::OutputShape`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScoreResult {
    Days(Vec<ScoredDay>),
    Scalar(f64),
    Means(RangeMeans),
}
