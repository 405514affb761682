mod config;
mod datasets;
mod error;
mod report;
mod types;
mod utils;
mod weather;

pub use config::*;
pub use error::{FailureKind, PipelineError};
pub use report::{EntityFailure, RunReport};
pub use utils::{ensure_dir_exists, get_data_dir};

pub use types::daily_variable::*;
pub use types::location::*;
pub use types::month::Month;
pub use types::period::DateRange;

pub use weather::aggregator::*;
pub use weather::error::*;
pub use weather::fetcher::*;
pub use weather::pipeline::*;
pub use weather::plot::plot_monthly;
pub use weather::reshaper::*;
pub use weather::series::DailySeries;
pub use weather::validator::*;

pub use datasets::analysis::*;
pub use datasets::catalog::*;
pub use datasets::downloader::{CacheStatus, Downloader};
pub use datasets::error::DatasetError;
pub use datasets::loader::*;
pub use datasets::pipeline::*;
pub use datasets::profiler::{
    duplicate_rows, profile, ColumnProfile, ColumnSummary, FailedStep, ProfileReport, ProfileStep,
};
pub use datasets::storage::*;
pub use datasets::visualizer::*;
