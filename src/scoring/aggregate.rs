use crate::error::ScoreError;
use crate::scoring::config::SummaryFields;
use crate::scoring::types::{DailySummary, HourlyRecord};
use crate::scoring::utility::{mean, pct, sum};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

/// Wind speed (km/h) above which an hour counts as windy.
pub const WINDY_HOUR_THRESHOLD_KMH: f64 = 5.0;

/// Groups hourly records by local calendar date and reduces each day to a
/// [`DailySummary`].
///
/// Output is ordered by date and holds one entry per date present in the
/// input. Missing readings are not imputed: a day with some missing values
/// gets NaN for the affected statistic, while a day with no cloud cover or no
/// wind readings at all is an error.
pub fn aggregate(
    hourly: &[HourlyRecord],
    fields: SummaryFields,
) -> Result<Vec<DailySummary>, ScoreError> {
    if hourly.is_empty() {
        return Err(ScoreError::input_shape("hourly", "no hourly records"));
    }

    let mut days: BTreeMap<NaiveDate, Vec<&HourlyRecord>> = BTreeMap::new();
    for record in hourly {
        days.entry(record.date()).or_default().push(record);
    }

    let summaries = days
        .into_iter()
        .map(|(date, hours)| summarize_day(date, &hours, fields))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        hours = hourly.len(),
        days = summaries.len(),
        "Aggregated hourly records"
    );

    Ok(summaries)
}

fn summarize_day(
    date: NaiveDate,
    hours: &[&HourlyRecord],
    fields: SummaryFields,
) -> Result<DailySummary, ScoreError> {
    let cloud_cover = required_series(date, "cloudcover", hours, |h| h.cloud_cover_pct)?;
    let wind_speed = required_series(date, "wind_speed_10m", hours, |h| h.wind_speed_10m)?;

    let windy_hours_pct = fields.windy_hours_pct.then(|| {
        let windy = hours
            .iter()
            .filter(|h| h.wind_speed_10m.is_some_and(|w| w > WINDY_HOUR_THRESHOLD_KMH))
            .count();
        pct(windy, hours.len())
    });

    let humidity_pct = if fields.humidity {
        optional_series(hours, |h| h.relative_humidity_pct).map(|values| mean(&values))
    } else {
        None
    };

    Ok(DailySummary {
        date,
        clear_sky_pct: 100.0 - mean(&cloud_cover),
        avg_wind_speed: mean(&wind_speed),
        windy_hours_pct,
        humidity_pct,
        rain_quantity_mm: sum(&series(hours, |h| h.precipitation_mm)),
        snow_quantity_mm: sum(&series(hours, |h| h.snowfall_mm)),
    })
}

/// Readings for one field with missing values as NaN.
fn series(hours: &[&HourlyRecord], field: impl Fn(&HourlyRecord) -> Option<f64>) -> Vec<f64> {
    hours.iter().map(|h| field(*h).unwrap_or(f64::NAN)).collect()
}

/// Like [`series`], but `None` when the day has no reading for the field.
fn optional_series(
    hours: &[&HourlyRecord],
    field: impl Fn(&HourlyRecord) -> Option<f64>,
) -> Option<Vec<f64>> {
    if hours.iter().all(|h| field(*h).is_none()) {
        None
    } else {
        Some(series(hours, field))
    }
}

fn required_series(
    date: NaiveDate,
    name: &'static str,
    hours: &[&HourlyRecord],
    field: impl Fn(&HourlyRecord) -> Option<f64>,
) -> Result<Vec<f64>, ScoreError> {
    optional_series(hours, field).ok_or(ScoreError::Aggregation { date, field: name })
}
