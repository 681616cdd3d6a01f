//! Pipeline configuration.

use clap::ValueEnum;

/// How daily summaries are matched with provider daily records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum JoinPolicy {
    /// Keep only dates present on both sides.
    #[default]
    Inner,
    /// Keep every summary; provider fields are null where no record matches.
    Left,
    /// Every summary must have a provider record, otherwise fail.
    Strict,
}

/// Shape of the value a pipeline run returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputShape {
    /// Every scored day with its component breakdown.
    #[default]
    #[value(name = "full")]
    FullBreakdown,
    /// Mean Always Sunny Score across the range.
    #[value(name = "mean")]
    ScalarMean,
    /// Score of the earliest scored day.
    #[value(name = "first-day")]
    FirstDayScalar,
    /// Range means of clear skies, wind, rain, snow and the score.
    #[value(name = "mean-breakdown")]
    MeanBreakdown,
}

/// Optional per-day statistics the aggregator computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryFields {
    pub humidity: bool,
    pub windy_hours_pct: bool,
}

impl Default for SummaryFields {
    fn default() -> Self {
        Self {
            humidity: true,
            windy_hours_pct: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub include_humidity: bool,
    pub include_windy_hours_pct: bool,
    pub merge_provider_daily: bool,
    pub join: JoinPolicy,
    pub output: OutputShape,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            include_humidity: true,
            include_windy_hours_pct: true,
            merge_provider_daily: true,
            join: JoinPolicy::default(),
            output: OutputShape::default(),
        }
    }
}

impl PipelineConfig {
    pub fn summary_fields(&self) -> SummaryFields {
        SummaryFields {
            humidity: self.include_humidity,
            windy_hours_pct: self.include_windy_hours_pct,
        }
    }

    pub fn with_output(mut self, output: OutputShape) -> Self {
        self.output = output;
        self
    }

    pub fn with_join(mut self, join: JoinPolicy) -> Self {
        self.join = join;
        self
    }
}
