//! Error types for the scoring pipeline and its HTTP plumbing.

use chrono::NaiveDate;
use thiserror::Error;

/// Failures raised while turning a weather payload into scored days.
///
/// Each variant is a distinct outcome the caller must handle; none of them
/// stands in for a zero score.
#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    /// A section of the payload is missing, empty or has parallel arrays of
    /// different lengths, or a timestamp failed to parse.
    #[error("invalid {section} input: {reason}")]
    InputShape {
        section: &'static str,
        reason: String,
    },

    /// A field needed for a daily mean has no reading at all on that day.
    #[error("no {field} readings for {date}")]
    Aggregation {
        date: NaiveDate,
        field: &'static str,
    },

    /// The daily summaries could not be joined with the provider records.
    #[error("no sunny score available: {0}")]
    Composition(String),
}

impl ScoreError {
    pub(crate) fn input_shape(section: &'static str, reason: impl Into<String>) -> Self {
        ScoreError::InputShape {
            section,
            reason: reason.into(),
        }
    }
}

/// Failures raised by [`crate::fetch::Fetcher`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request to {url} failed")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("response cache error at '{path}'")]
    Cache {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
