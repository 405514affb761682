use crate::config::ConfigError;
use crate::datasets::error::DatasetError;
use crate::weather::error::WeatherError;
use chrono::NaiveDate;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a failure, used when reporting per-entity outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Network or HTTP level failure.
    Transport,
    /// Payload shape did not match what the pipeline requires.
    Schema,
    /// Local file missing, unreadable or corrupt.
    Load,
    /// Missing credentials or storage session setup failure.
    Config,
    /// A dataframe computation or chart rendering step failed.
    Processing,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Transport => "transport",
            FailureKind::Schema => "schema",
            FailureKind::Load => "load",
            FailureKind::Config => "config",
            FailureKind::Processing => "processing",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Weather(#[from] WeatherError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Failed to create directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine data directory")]
    DataDirResolution,
}

impl PipelineError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PipelineError::Weather(e) => e.kind(),
            PipelineError::Dataset(e) => e.kind(),
            PipelineError::Config(e) => e.kind(),
            PipelineError::InvalidDateRange { .. } => FailureKind::Config,
            PipelineError::DirCreation(..) | PipelineError::DataDirResolution => FailureKind::Load,
        }
    }
}
