//! Always Sunny Score: daily aggregation and scoring of hourly weather data.

pub mod error;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod scoring;

pub use error::{FetchError, ScoreError};
