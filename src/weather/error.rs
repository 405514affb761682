use crate::error::FailureKind;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons a payload is rejected by [`crate::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("Payload is not a JSON object")]
    NotAnObject,

    #[error("Payload has no 'daily' object")]
    MissingDaily,

    #[error("'daily' is not a JSON object")]
    DailyNotAnObject,

    #[error("Required array 'daily.{0}' is missing")]
    MissingArray(String),

    #[error("'daily.{0}' is not an array")]
    NotAnArray(String),

    #[error("'daily.{0}' has fewer than 1 item")]
    EmptyArray(String),

    #[error("'daily.{field}[{index}]' is not of type {expected}")]
    WrongItemType {
        field: String,
        index: usize,
        expected: &'static str,
    },
}

/// Reasons a validated series cannot be turned into an observation table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReshapeError {
    #[error("'{variable}' has {found} values but 'time' has {expected}")]
    LengthMismatch {
        variable: String,
        expected: usize,
        found: usize,
    },

    #[error("Cannot parse '{value}' at position {index} as a calendar date")]
    InvalidDate { index: usize, value: String },
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Response body from {0} is not valid JSON")]
    JsonDecode(String, #[source] reqwest::Error),

    #[error("Schema validation failed")]
    Schema(#[from] SchemaError),

    #[error("Cannot reshape daily series")]
    Reshape(#[from] ReshapeError),

    #[error("Failed processing DataFrame")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("Failed to prepare chart output '{0}'")]
    ChartOutput(PathBuf, #[source] std::io::Error),
}

impl WeatherError {
    pub fn kind(&self) -> FailureKind {
        match self {
            WeatherError::NetworkRequest(..)
            | WeatherError::HttpStatus { .. }
            | WeatherError::JsonDecode(..) => FailureKind::Transport,
            WeatherError::Schema(_) | WeatherError::Reshape(_) => FailureKind::Schema,
            WeatherError::DataFrameProcessing(_) | WeatherError::ChartOutput(..) => {
                FailureKind::Processing
            }
        }
    }
}
