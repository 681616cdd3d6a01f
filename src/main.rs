//! CLI entry point for the Always Sunny Score tool.
//!
//! Provides subcommands for scoring a city over a date range, scoring a
//! stored or remote weather payload, and geocoding a place name.

mod infra;
mod services;

use crate::infra::opencage::client::OpenCageClient;
use crate::infra::openmeteo::client::OpenMeteoClient;
use crate::services::geocoding::{Coordinates, Geocoder};
use crate::services::weather_api::WeatherApi;
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use sunny_score::{
    fetch::{
        BasicClient, DEFAULT_CACHE_DIR, Fetcher, ResponseCache, Retry, RetryConfig, auth::UrlParam,
    },
    output::{append_records, print_pretty, write_json},
    parser::{parse_payload, payload_from_value},
    scoring::{
        JoinPolicy, OutputShape, PipelineConfig, ScoreResult, ScoredDay, WeatherPayload,
        pipeline::{score_days, shape},
        utility::round3,
    },
};
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "sunny_score")]
#[command(about = "Score how sunny a place is over a date range", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Geocode a city, fetch its weather and score every day in the range
    Score {
        #[arg(long)]
        city: String,

        #[arg(long)]
        province: String,

        /// First day of the range (YYYY-MM-DD)
        #[arg(long)]
        start_date: NaiveDate,

        /// Last day of the range, inclusive (YYYY-MM-DD)
        #[arg(long)]
        end_date: NaiveDate,

        /// Include the raw weather payload in the report
        #[arg(long, default_value_t = false)]
        include_payload: bool,

        #[command(flatten)]
        pipeline: PipelineArgs,

        #[command(flatten)]
        fetch: FetchArgs,
    },
    /// Score a weather payload from a file or URL
    Analyze {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        #[command(flatten)]
        pipeline: PipelineArgs,

        #[command(flatten)]
        fetch: FetchArgs,
    },
    /// Resolve a city and province/state to coordinates
    Geocode {
        #[arg(long)]
        city: String,

        #[arg(long)]
        province: String,

        #[command(flatten)]
        fetch: FetchArgs,
    },
}

#[derive(Args)]
struct PipelineArgs {
    /// Shape of the result
    #[arg(long, value_enum, default_value_t = OutputShape::FullBreakdown)]
    shape: OutputShape,

    /// How daily summaries are matched with the provider's daily records
    #[arg(long, value_enum, default_value_t = JoinPolicy::Inner)]
    join: JoinPolicy,

    /// Skip the daily humidity mean
    #[arg(long, default_value_t = false)]
    no_humidity: bool,

    /// Skip the windy hours percentage
    #[arg(long, default_value_t = false)]
    no_windy_hours: bool,

    /// Score daily summaries without merging the provider's daily records
    #[arg(long, default_value_t = false)]
    no_merge: bool,

    /// CSV file to append scored days to
    #[arg(short, long)]
    output: Option<String>,
}

impl PipelineArgs {
    fn config(&self) -> PipelineConfig {
        PipelineConfig {
            include_humidity: !self.no_humidity,
            include_windy_hours_pct: !self.no_windy_hours,
            merge_provider_daily: !self.no_merge,
            join: self.join,
            output: self.shape,
        }
    }
}

#[derive(Args)]
struct FetchArgs {
    /// Retries for transient upstream failures
    #[arg(long, default_value_t = RetryConfig::default().max_retries)]
    retries: u32,

    /// Delay before the first retry, doubled on each further attempt
    #[arg(long, default_value_t = 200)]
    backoff_ms: u64,

    /// Upper bound for a single retry delay
    #[arg(long, default_value_t = 10_000)]
    max_backoff_ms: u64,

    /// Directory for cached weather responses
    #[arg(long, default_value = DEFAULT_CACHE_DIR)]
    cache_dir: String,

    /// Lifetime of cached weather responses in seconds (0 disables the cache)
    #[arg(long, default_value_t = 3600)]
    cache_ttl_secs: u64,
}

impl FetchArgs {
    fn retry_config(&self) -> RetryConfig {
        RetryConfig::new(self.retries, self.backoff_ms, self.max_backoff_ms)
    }

    fn fetcher(&self) -> Result<Fetcher<Retry<BasicClient>>> {
        let client = Retry::new(BasicClient::new()?, self.retry_config());
        let fetcher = Fetcher::new(client);

        if self.cache_ttl_secs == 0 {
            debug!("Response cache disabled");
            return Ok(fetcher);
        }

        let cache = ResponseCache::new(&self.cache_dir, Duration::from_secs(self.cache_ttl_secs));
        Ok(fetcher.with_cache(cache))
    }
}

/// Response shape of the `score` command.
#[derive(Serialize)]
struct ScoreReport {
    city: String,
    province: String,
    latitude: f64,
    longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    weather_data: Option<serde_json::Value>,
    sunny_score: ScoreResult,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/sunny_score.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("sunny_score.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            city,
            province,
            start_date,
            end_date,
            include_payload,
            pipeline,
            fetch,
        } => {
            if start_date > end_date {
                bail!("start date {start_date} is after end date {end_date}");
            }

            let location = geocoder(&fetch)?.locate(&city, &province).await?;
            let weather = OpenMeteoClient::new(fetch.fetcher()?);
            let raw = weather.forecast(location, start_date, end_date).await?;

            let payload = payload_from_value(raw.clone())?;
            let sunny_score = score(&payload, &pipeline)?;

            let report = ScoreReport {
                city,
                province,
                latitude: location.latitude,
                longitude: location.longitude,
                weather_data: include_payload.then_some(raw),
                sunny_score,
            };
            write_json(std::io::stdout().lock(), &report)?;
        }
        Commands::Analyze {
            source,
            pipeline,
            fetch,
        } => {
            let bytes = load_source(&source, &fetch).await?;
            let payload = parse_payload(&bytes)?;
            let result = score(&payload, &pipeline)?;

            write_json(std::io::stdout().lock(), &result)?;
        }
        Commands::Geocode {
            city,
            province,
            fetch,
        } => {
            let location: Coordinates = geocoder(&fetch)?.locate(&city, &province).await?;
            write_json(std::io::stdout().lock(), &location)?;
        }
    }

    Ok(())
}

/// Builds the OpenCage geocoder from `OPENCAGE_API_KEY`.
fn geocoder(fetch: &FetchArgs) -> Result<OpenCageClient<UrlParam<Retry<BasicClient>>>> {
    let api_key =
        std::env::var("OPENCAGE_API_KEY").context("OPENCAGE_API_KEY must be set to geocode")?;
    let client = Retry::new(BasicClient::new()?, fetch.retry_config());
    Ok(OpenCageClient::new(UrlParam::new(client, "key", api_key)))
}

/// Loads payload data from a local file path or fetches it over HTTP.
#[tracing::instrument(skip(fetch))]
async fn load_source(source: &str, fetch: &FetchArgs) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http") {
        fetch.fetcher()?.get(source).await?.to_vec()
    } else {
        std::fs::read(source).with_context(|| format!("Failed to read {source}"))?
    };
    Ok(bytes)
}

/// Scores the payload and rounds the reported figures. Scored days are
/// exported before shaping so the CSV always holds every day.
fn score(payload: &WeatherPayload, args: &PipelineArgs) -> Result<ScoreResult> {
    let config = args.config();
    let days = score_days(payload, &config)?;
    export_days(&days, args.output.as_deref())?;

    Ok(rounded(shape(days, config.output)))
}

fn export_days(days: &[ScoredDay], csv_path: Option<&str>) -> Result<()> {
    print_pretty(days);

    if let Some(path) = csv_path {
        append_records(path, days)?;
        info!(path, rows = days.len(), "Scored days appended");
    }
    Ok(())
}

/// Rounds scalar figures to three decimals for reporting.
fn rounded(result: ScoreResult) -> ScoreResult {
    match result {
        ScoreResult::Scalar(score) => ScoreResult::Scalar(round3(score)),
        ScoreResult::Means(mut means) => {
            means.clear_skies = round3(means.clear_skies);
            means.wind_speed = round3(means.wind_speed);
            means.rain_amount = round3(means.rain_amount);
            means.snow_amount = round3(means.snow_amount);
            means.sunny_score = round3(means.sunny_score);
            ScoreResult::Means(means)
        }
        days => days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sunny_score::scoring::RangeMeans;

    #[test]
    fn test_cli_parses_score_command() {
        let cli = Cli::try_parse_from([
            "sunny_score",
            "score",
            "--city",
            "Toronto",
            "--province",
            "Ontario",
            "--start-date",
            "2024-06-01",
            "--end-date",
            "2024-06-07",
            "--shape",
            "mean",
            "--join",
            "left",
            "--no-humidity",
        ])
        .unwrap();

        let Commands::Score {
            start_date,
            pipeline,
            fetch,
            ..
        } = cli.command
        else {
            panic!("expected score command");
        };
        assert_eq!(start_date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());

        let config = pipeline.config();
        assert_eq!(config.output, OutputShape::ScalarMean);
        assert_eq!(config.join, JoinPolicy::Left);
        assert!(!config.include_humidity);
        assert!(config.include_windy_hours_pct);
        assert!(config.merge_provider_daily);

        assert_eq!(fetch.retries, 5);
        assert_eq!(fetch.cache_dir, ".cache");
        assert_eq!(fetch.cache_ttl_secs, 3600);
    }

    #[test]
    fn test_cli_rejects_bad_date() {
        let result = Cli::try_parse_from([
            "sunny_score",
            "score",
            "--city",
            "Toronto",
            "--province",
            "Ontario",
            "--start-date",
            "June 1st",
            "--end-date",
            "2024-06-07",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rounded_scalar_and_means() {
        assert_eq!(
            rounded(ScoreResult::Scalar(64.12345)),
            ScoreResult::Scalar(64.123)
        );

        let means = RangeMeans {
            clear_skies: 80.00049,
            wind_speed: 2.3456,
            rain_amount: 0.0,
            snow_amount: 1.0005,
            sunny_score: 71.9999,
        };
        let ScoreResult::Means(r) = rounded(ScoreResult::Means(means)) else {
            panic!("expected means");
        };
        assert_eq!(r.clear_skies, 80.0);
        assert_eq!(r.wind_speed, 2.346);
        assert_eq!(r.sunny_score, 72.0);
    }

    #[test]
    fn test_score_analyze_fixture() {
        let bytes = include_bytes!("../tests/fixtures/open_meteo_sample.json");
        let payload = parse_payload(bytes).unwrap();
        let args = PipelineArgs {
            shape: OutputShape::ScalarMean,
            join: JoinPolicy::Inner,
            no_humidity: false,
            no_windy_hours: false,
            no_merge: false,
            output: None,
        };

        let ScoreResult::Scalar(score) = score(&payload, &args).unwrap() else {
            panic!("expected scalar");
        };
        assert!((0.0..=100.0).contains(&score));
    }

    #[test]
    fn test_score_exports_every_day_before_shaping() {
        let bytes = include_bytes!("../tests/fixtures/open_meteo_sample.json");
        let payload = parse_payload(bytes).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("scores.csv");
        let args = PipelineArgs {
            shape: OutputShape::FirstDayScalar,
            join: JoinPolicy::Inner,
            no_humidity: false,
            no_windy_hours: false,
            no_merge: false,
            output: Some(csv_path.to_str().unwrap().to_string()),
        };

        assert_eq!(score(&payload, &args).unwrap(), ScoreResult::Scalar(80.0));

        let content = std::fs::read_to_string(&csv_path).unwrap();
        // header + the two days matched with provider records
        assert_eq!(content.lines().count(), 3);
    }
}
