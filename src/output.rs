//! Output formatting and persistence for scoring results.
//!
//! Supports pretty-printing, JSON serialization, and CSV append.

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::scoring::types::ScoredDay;
use chrono::NaiveDate;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Logs scored days using Rust's debug pretty-print format.
pub fn print_pretty(days: &[ScoredDay]) {
    debug!("{:#?}", days);
}

/// Writes `value` as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(mut writer: W, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// One CSV line per scored day. Every column is always written so rows from
/// different days and runs line up under the same header; `None` becomes an
/// empty cell.
#[derive(Serialize)]
struct CsvRow {
    time: NaiveDate,
    #[serde(rename = "Clear skies % of day")]
    clear_sky_pct: f64,
    #[serde(rename = "Avg wind speed")]
    avg_wind_speed: f64,
    #[serde(rename = "Windy hours %")]
    windy_hours_pct: Option<f64>,
    #[serde(rename = "Humidity %")]
    humidity_pct: Option<f64>,
    #[serde(rename = "Rain Quantity")]
    rain_quantity_mm: f64,
    #[serde(rename = "Snow Quantity")]
    snow_quantity_mm: f64,
    precipitation_sum: Option<f64>,
    precipitation_hours: Option<f64>,
    cloudcover_mean: Option<f64>,
    #[serde(rename = "Clear Skies Score")]
    clear_skies_score: f64,
    #[serde(rename = "Wind Penalty")]
    wind_penalty: f64,
    #[serde(rename = "Rain Penalty")]
    rain_penalty: f64,
    #[serde(rename = "Snow Penalty")]
    snow_penalty: f64,
    #[serde(rename = "Always Sunny Score")]
    always_sunny_score: f64,
}

impl From<&ScoredDay> for CsvRow {
    fn from(day: &ScoredDay) -> Self {
        Self {
            time: day.date,
            clear_sky_pct: day.clear_sky_pct,
            avg_wind_speed: day.avg_wind_speed,
            windy_hours_pct: day.windy_hours_pct,
            humidity_pct: day.humidity_pct,
            rain_quantity_mm: day.rain_quantity_mm,
            snow_quantity_mm: day.snow_quantity_mm,
            precipitation_sum: day.precipitation_sum,
            precipitation_hours: day.precipitation_hours,
            cloudcover_mean: day.cloudcover_mean,
            clear_skies_score: day.clear_skies_score,
            wind_penalty: day.wind_penalty,
            rain_penalty: day.rain_penalty,
            snow_penalty: day.snow_penalty,
            always_sunny_score: day.always_sunny_score,
        }
    }
}

/// Appends [`ScoredDay`] rows to a CSV file.
///
/// Creates the file with headers if it does not already exist. The column
/// set is fixed, so optional statistics that were skipped or missing leave
/// empty cells.
pub fn append_records(path: &str, days: &[ScoredDay]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = days.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for day in days {
        writer.serialize(CsvRow::from(day))?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::types::{DailySummary, ScoreResult};
    use crate::scoring::compose::score_summaries;
    use chrono::NaiveDate;
    use std::fs;

    fn days() -> Vec<ScoredDay> {
        let summaries: Vec<_> = (1..=2)
            .map(|d| DailySummary {
                date: NaiveDate::from_ymd_opt(2024, 6, d).unwrap(),
                clear_sky_pct: 80.0,
                avg_wind_speed: 2.0,
                windy_hours_pct: Some(0.0),
                humidity_pct: Some(50.0),
                rain_quantity_mm: 0.0,
                snow_quantity_mm: 0.0,
            })
            .collect();
        score_summaries(&summaries).unwrap()
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&days());
    }

    #[test]
    fn test_write_json_scalar() {
        let mut buf = Vec::new();
        write_json(&mut buf, &ScoreResult::Scalar(71.5)).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "71.5\n");
    }

    #[test]
    fn test_write_json_days_is_list_of_mappings() {
        let mut buf = Vec::new();
        write_json(&mut buf, &ScoreResult::Days(days())).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Always Sunny Score"], 80.0);
        assert_eq!(rows[0]["Clear skies % of day"], 80.0);
        assert!(rows[0]["precipitation_sum"].is_null());
    }

    #[test]
    fn test_append_records_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        let path = path.to_str().unwrap();

        append_records(path, &days()).unwrap();
        append_records(path, &days()).unwrap();

        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        // 1 header + 4 data rows
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("time,Clear skies % of day,"));
        assert!(lines[0].ends_with(",Always Sunny Score"));
        assert_eq!(content.matches("Always Sunny Score").count(), 1);
    }

    #[test]
    fn test_append_records_keeps_columns_for_missing_optionals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        let path = path.to_str().unwrap();

        let mut mixed = days();
        mixed[1].humidity_pct = None;
        append_records(path, &mixed).unwrap();

        let mut without_optionals = days();
        for day in &mut without_optionals {
            day.humidity_pct = None;
            day.windy_hours_pct = None;
        }
        append_records(path, &without_optionals).unwrap();

        let mut reader = csv::Reader::from_path(path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 15);
        assert_eq!(&headers[4], "Humidity %");

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.len() == headers.len()));
        assert_eq!(&rows[0][4], "50.0");
        assert_eq!(&rows[1][4], "");
        assert_eq!(&rows[3][3], "");
        assert_eq!(&rows[3][14], "80.0");
    }
}
