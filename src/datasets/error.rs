use crate::error::FailureKind;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to download '{key}' from bucket '{bucket}'")]
    Storage {
        bucket: String,
        key: String,
        #[source]
        source: object_store::Error,
    },

    #[error("I/O error writing download to '{0}'")]
    DownloadIo(PathBuf, #[source] std::io::Error),

    #[error("Failed to create directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to open dataset file '{0}'")]
    LoadIo(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse dataset file '{0}'")]
    LoadPolars(PathBuf, #[source] PolarsError),

    #[error("Dataset '{0}' is not available")]
    Unavailable(String),

    #[error("Dataset '{0}' has no rows")]
    EmptyDataset(String),

    #[error("Missing required column '{column}' in {dataset}")]
    MissingColumn { dataset: String, column: String },

    #[error("Failed processing DataFrame")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("Failed to prepare chart output '{0}'")]
    ChartOutput(PathBuf, #[source] std::io::Error),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl DatasetError {
    pub fn kind(&self) -> FailureKind {
        match self {
            DatasetError::Storage { .. } | DatasetError::DownloadIo(..) => FailureKind::Transport,
            DatasetError::DirCreation(..)
            | DatasetError::LoadIo(..)
            | DatasetError::LoadPolars(..)
            | DatasetError::Unavailable(_) => FailureKind::Load,
            DatasetError::EmptyDataset(_)
            | DatasetError::MissingColumn { .. }
            | DatasetError::DataFrameProcessing(_)
            | DatasetError::ChartOutput(..)
            | DatasetError::TaskJoin(_) => FailureKind::Processing,
        }
    }
}
