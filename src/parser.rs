//! JSON parser for Open-Meteo style forecast payloads.
//!
//! Both sections are column-oriented: parallel arrays sharing a `time` axis.
//! They are validated and turned into row records here.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::error::ScoreError;
use crate::scoring::types::{DailyProviderRecord, HourlyRecord, WeatherPayload};

#[derive(Debug, Deserialize)]
struct RawPayload {
    hourly: Option<RawHourly>,
    daily: Option<RawDaily>,
}

#[derive(Debug, Deserialize)]
struct RawHourly {
    time: Vec<String>,
    #[serde(alias = "cloud_cover")]
    cloudcover: Vec<Option<f64>>,
    wind_speed_10m: Vec<Option<f64>>,
    precipitation: Vec<Option<f64>>,
    snowfall: Vec<Option<f64>>,
    #[serde(default)]
    relative_humidity_2m: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct RawDaily {
    time: Vec<String>,
    precipitation_sum: Vec<Option<f64>>,
    precipitation_hours: Vec<Option<f64>>,
    #[serde(alias = "cloud_cover_mean")]
    cloudcover_mean: Vec<Option<f64>>,
}

/// Decodes a forecast payload from raw JSON bytes.
///
/// # Errors
///
/// Returns [`ScoreError::InputShape`] if the JSON is malformed, the hourly
/// section is missing or empty, any parallel arrays differ in length, or a
/// timestamp cannot be parsed.
pub fn parse_payload(bytes: &[u8]) -> Result<WeatherPayload, ScoreError> {
    let raw: RawPayload = serde_json::from_slice(bytes)
        .map_err(|e| ScoreError::input_shape("payload", e.to_string()))?;
    from_raw(raw)
}

/// Decodes a forecast payload that has already been parsed as JSON.
pub fn payload_from_value(value: serde_json::Value) -> Result<WeatherPayload, ScoreError> {
    let raw: RawPayload = serde_json::from_value(value)
        .map_err(|e| ScoreError::input_shape("payload", e.to_string()))?;
    from_raw(raw)
}

fn from_raw(raw: RawPayload) -> Result<WeatherPayload, ScoreError> {
    let hourly = raw
        .hourly
        .ok_or_else(|| ScoreError::input_shape("hourly", "section missing"))?;

    Ok(WeatherPayload {
        hourly: hourly_records(hourly)?,
        daily: raw.daily.map(daily_records).transpose()?.unwrap_or_default(),
    })
}

fn hourly_records(raw: RawHourly) -> Result<Vec<HourlyRecord>, ScoreError> {
    let len = raw.time.len();
    if len == 0 {
        return Err(ScoreError::input_shape("hourly", "no timestamps"));
    }

    check_len("hourly", "cloudcover", len, raw.cloudcover.len())?;
    check_len("hourly", "wind_speed_10m", len, raw.wind_speed_10m.len())?;
    check_len("hourly", "precipitation", len, raw.precipitation.len())?;
    check_len("hourly", "snowfall", len, raw.snowfall.len())?;
    if let Some(humidity) = &raw.relative_humidity_2m {
        check_len("hourly", "relative_humidity_2m", len, humidity.len())?;
    }

    raw.time
        .iter()
        .enumerate()
        .map(|(i, time)| -> Result<HourlyRecord, ScoreError> {
            Ok(HourlyRecord {
                timestamp: parse_hour(time)?,
                cloud_cover_pct: raw.cloudcover[i],
                wind_speed_10m: raw.wind_speed_10m[i],
                precipitation_mm: raw.precipitation[i],
                snowfall_mm: raw.snowfall[i],
                relative_humidity_pct: raw.relative_humidity_2m.as_ref().and_then(|h| h[i]),
            })
        })
        .collect()
}

fn daily_records(raw: RawDaily) -> Result<Vec<DailyProviderRecord>, ScoreError> {
    let len = raw.time.len();
    check_len("daily", "precipitation_sum", len, raw.precipitation_sum.len())?;
    check_len("daily", "precipitation_hours", len, raw.precipitation_hours.len())?;
    check_len("daily", "cloudcover_mean", len, raw.cloudcover_mean.len())?;

    raw.time
        .iter()
        .enumerate()
        .map(|(i, time)| -> Result<DailyProviderRecord, ScoreError> {
            Ok(DailyProviderRecord {
                date: NaiveDate::parse_from_str(time, "%Y-%m-%d").map_err(|e| {
                    ScoreError::input_shape("daily", format!("bad date '{time}': {e}"))
                })?,
                precipitation_sum_mm: raw.precipitation_sum[i],
                precipitation_hours: raw.precipitation_hours[i],
                cloudcover_mean_pct: raw.cloudcover_mean[i],
            })
        })
        .collect()
}

fn parse_hour(time: &str) -> Result<NaiveDateTime, ScoreError> {
    NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| ScoreError::input_shape("hourly", format!("bad timestamp '{time}': {e}")))
}

fn check_len(
    section: &'static str,
    field: &str,
    expected: usize,
    actual: usize,
) -> Result<(), ScoreError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ScoreError::input_shape(
            section,
            format!("{field} has {actual} values, time has {expected}"),
        ))
    }
}
