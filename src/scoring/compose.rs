use crate::error::ScoreError;
use crate::scoring::config::JoinPolicy;
use crate::scoring::types::{DailyProviderRecord, DailySummary, ScoreBreakdown, ScoredDay};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Average wind speed (km/h) above which the whole average is subtracted.
///
/// Independent of [`super::aggregate::WINDY_HOUR_THRESHOLD_KMH`].
pub const WIND_PENALTY_THRESHOLD_KMH: f64 = 3.0;

/// Score points removed per millimetre of rain or snow.
pub const PRECIPITATION_PENALTY_PER_MM: f64 = 1.5;

/// Computes the Always Sunny Score and its components.
///
/// `score = clear_skies - wind - 1.5 * rain - 1.5 * snow`, floored at 0, where
/// the wind term only applies above [`WIND_PENALTY_THRESHOLD_KMH`]. NaN clear
/// skies, rain or snow yield a NaN score rather than being floored.
pub fn always_sunny_score(
    clear_skies: f64,
    wind_speed: f64,
    rain_quantity: f64,
    snow_quantity: f64,
) -> ScoreBreakdown {
    // A NaN average never exceeds the threshold, so it carries no penalty.
    let wind_penalty = if wind_speed > WIND_PENALTY_THRESHOLD_KMH {
        wind_speed
    } else {
        0.0
    };
    let rain_penalty = rain_quantity * PRECIPITATION_PENALTY_PER_MM;
    let snow_penalty = snow_quantity * PRECIPITATION_PENALTY_PER_MM;

    let raw = clear_skies - wind_penalty - rain_penalty - snow_penalty;
    let always_sunny_score = if raw.is_nan() { raw } else { raw.max(0.0) };

    ScoreBreakdown {
        clear_skies_score: clear_skies,
        wind_penalty,
        rain_penalty,
        snow_penalty,
        always_sunny_score,
    }
}

/// Joins daily summaries with provider daily records by date and scores each
/// joined day.
///
/// Output follows the order of `summaries`, which the aggregator produces in
/// ascending date order.
///
/// # Errors
///
/// [`ScoreError::Composition`] when the join yields no rows, or under
/// [`JoinPolicy::Strict`] when any summary has no provider record.
pub fn compose(
    summaries: &[DailySummary],
    provider: &[DailyProviderRecord],
    join: JoinPolicy,
) -> Result<Vec<ScoredDay>, ScoreError> {
    let by_date: HashMap<NaiveDate, &DailyProviderRecord> =
        provider.iter().map(|r| (r.date, r)).collect();

    let mut days = Vec::with_capacity(summaries.len());
    let mut unmatched = 0usize;

    for summary in summaries {
        let record = by_date.get(&summary.date).copied();
        match (record, join) {
            (Some(_), _) | (None, JoinPolicy::Left) => days.push(score_day(summary, record)),
            (None, JoinPolicy::Inner) => unmatched += 1,
            (None, JoinPolicy::Strict) => {
                return Err(ScoreError::Composition(format!(
                    "no provider daily record for {}",
                    summary.date
                )));
            }
        }
    }

    if unmatched > 0 {
        warn!(unmatched, "Dropped days without a provider daily record");
    }

    if days.is_empty() {
        return Err(ScoreError::Composition(
            "no overlapping dates between hourly and daily data".to_string(),
        ));
    }

    debug!(days = days.len(), ?join, "Composed scored days");
    Ok(days)
}

/// Scores every summary without merging provider records.
pub fn score_summaries(summaries: &[DailySummary]) -> Result<Vec<ScoredDay>, ScoreError> {
    if summaries.is_empty() {
        return Err(ScoreError::Composition("no daily summaries".to_string()));
    }
    Ok(summaries.iter().map(|s| score_day(s, None)).collect())
}

fn score_day(summary: &DailySummary, provider: Option<&DailyProviderRecord>) -> ScoredDay {
    let b = always_sunny_score(
        summary.clear_sky_pct,
        summary.avg_wind_speed,
        summary.rain_quantity_mm,
        summary.snow_quantity_mm,
    );

    ScoredDay {
        date: summary.date,
        clear_sky_pct: summary.clear_sky_pct,
        avg_wind_speed: summary.avg_wind_speed,
        windy_hours_pct: summary.windy_hours_pct,
        humidity_pct: summary.humidity_pct,
        rain_quantity_mm: summary.rain_quantity_mm,
        snow_quantity_mm: summary.snow_quantity_mm,
        precipitation_sum: provider.and_then(|p| p.precipitation_sum_mm),
        precipitation_hours: provider.and_then(|p| p.precipitation_hours),
        cloudcover_mean: provider.and_then(|p| p.cloudcover_mean_pct),
        clear_skies_score: b.clear_skies_score,
        wind_penalty: b.wind_penalty,
        rain_penalty: b.rain_penalty,
        snow_penalty: b.snow_penalty,
        always_sunny_score: b.always_sunny_score,
    }
}
