use crate::error::ScoreError;
use crate::scoring::aggregate::aggregate;
use crate::scoring::compose::{compose, score_summaries};
use crate::scoring::config::{OutputShape, PipelineConfig};
use crate::scoring::types::{RangeMeans, ScoreResult, ScoredDay, WeatherPayload};
use crate::scoring::utility::mean;
use tracing::info;

/// Runs aggregation and scoring over a decoded payload and shapes the result
/// as configured.
pub fn run(payload: &WeatherPayload, config: &PipelineConfig) -> Result<ScoreResult, ScoreError> {
    let days = score_days(payload, config)?;
    Ok(shape(days, config.output))
}

/// Aggregates the hourly section and scores each day, merging provider daily
/// records when configured.
pub fn score_days(
    payload: &WeatherPayload,
    config: &PipelineConfig,
) -> Result<Vec<ScoredDay>, ScoreError> {
    let summaries = aggregate(&payload.hourly, config.summary_fields())?;

    if config.merge_provider_daily {
        if payload.daily.is_empty() {
            return Err(ScoreError::input_shape("daily", "no daily records to merge"));
        }
        compose(&summaries, &payload.daily, config.join)
    } else {
        score_summaries(&summaries)
    }
}

/// Reduces scored days to the requested output shape. `days` must be
/// non-empty, as returned by [`score_days`].
pub fn shape(days: Vec<ScoredDay>, output: OutputShape) -> ScoreResult {
    let result = match output {
        OutputShape::FullBreakdown => ScoreResult::Days(days),
        OutputShape::ScalarMean => ScoreResult::Scalar(column_mean(&days, |d| d.always_sunny_score)),
        OutputShape::FirstDayScalar => ScoreResult::Scalar(
            days.first()
                .map(|d| d.always_sunny_score)
                .unwrap_or(f64::NAN),
        ),
        OutputShape::MeanBreakdown => ScoreResult::Means(RangeMeans {
            clear_skies: column_mean(&days, |d| d.clear_sky_pct),
            wind_speed: column_mean(&days, |d| d.avg_wind_speed),
            rain_amount: column_mean(&days, |d| d.rain_quantity_mm),
            snow_amount: column_mean(&days, |d| d.snow_quantity_mm),
            sunny_score: column_mean(&days, |d| d.always_sunny_score),
        }),
    };

    if let ScoreResult::Scalar(score) = result {
        info!(score, shape = ?output, "Computed sunny score");
    }
    result
}

fn column_mean(days: &[ScoredDay], column: impl Fn(&ScoredDay) -> f64) -> f64 {
    let values: Vec<f64> = days.iter().map(column).collect();
    mean(&values)
}
