//! Daily aggregation and Always Sunny scoring.
//!
//! Hourly observations are reduced to one [`types::DailySummary`] per local
//! calendar day, merged with the provider's daily records, and scored. The
//! whole pipeline is pure and holds no state between calls.

pub mod aggregate;
pub mod compose;
pub mod config;
pub mod pipeline;
pub mod types;
pub mod utility;

pub use aggregate::aggregate;
pub use compose::{always_sunny_score, compose};
pub use config::{JoinPolicy, OutputShape, PipelineConfig, SummaryFields};
pub use pipeline::run;
pub use types::{
    DailyProviderRecord, DailySummary, HourlyRecord, RangeMeans, ScoreBreakdown, ScoreResult,
    ScoredDay, WeatherPayload,
};
