//! Descriptive profile of a loaded dataset.
//!
//! Profiling never fails as a whole: each step that errors is logged and noted in
//! [`ProfileReport::failed_steps`], and the remaining steps still run.

use log::{info, warn};
use polars::prelude::*;
use std::fmt;

const HEAD_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    pub name: String,
    pub dtype: DataType,
    pub null_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSummary {
    Numeric {
        column: String,
        count: usize,
        mean: Option<f64>,
        std: Option<f64>,
        min: Option<f64>,
        median: Option<f64>,
        max: Option<f64>,
    },
    Categorical {
        column: String,
        count: usize,
        unique: usize,
    },
}

impl ColumnSummary {
    pub fn column(&self) -> &str {
        match self {
            ColumnSummary::Numeric { column, .. } | ColumnSummary::Categorical { column, .. } => {
                column
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileStep {
    Duplicates,
    Describe,
}

impl fmt::Display for ProfileStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileStep::Duplicates => write!(f, "duplicates"),
            ProfileStep::Describe => write!(f, "describe"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedStep {
    pub step: ProfileStep,
    pub column: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ProfileReport {
    pub name: String,
    pub shape: (usize, usize),
    pub columns: Vec<ColumnProfile>,
    /// `None` when duplicate detection failed.
    pub duplicate_rows: Option<usize>,
    pub summary: Vec<ColumnSummary>,
    pub head: DataFrame,
    pub failed_steps: Vec<FailedStep>,
}

impl ProfileReport {
    pub fn null_count(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|c| c.name == column)
            .map(|c| c.null_count)
    }

    pub fn summary_for(&self, column: &str) -> Option<&ColumnSummary> {
        self.summary.iter().find(|s| s.column() == column)
    }
}

/// Profiles `df` without modifying it.
pub fn profile(name: &str, df: &DataFrame) -> ProfileReport {
    info!("Profiling {} ({} rows x {} columns)", name, df.height(), df.width());
    let mut failed_steps = Vec::new();

    let columns = df
        .get_columns()
        .iter()
        .map(|c| ColumnProfile {
            name: c.name().to_string(),
            dtype: c.dtype().clone(),
            null_count: c.null_count(),
        })
        .collect();

    let duplicate_rows = match duplicate_rows(df) {
        Ok(n) => Some(n),
        Err(e) => {
            warn!("Duplicate check failed for {}: {}", name, e);
            failed_steps.push(FailedStep {
                step: ProfileStep::Duplicates,
                column: None,
                message: e.to_string(),
            });
            None
        }
    };

    let mut summary = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        match summarize(column.as_materialized_series()) {
            Ok(s) => summary.push(s),
            Err(e) => {
                warn!("Could not describe column {} of {}: {}", column.name(), name, e);
                failed_steps.push(FailedStep {
                    step: ProfileStep::Describe,
                    column: Some(column.name().to_string()),
                    message: e.to_string(),
                });
            }
        }
    }

    ProfileReport {
        name: name.to_string(),
        shape: df.shape(),
        columns,
        duplicate_rows,
        summary,
        head: df.head(Some(HEAD_ROWS)),
        failed_steps,
    }
}

/// Rows identical to an earlier row. The first occurrence is not counted.
///
/// Rows holding nested values are not comparable and make this fail.
pub fn duplicate_rows(df: &DataFrame) -> PolarsResult<usize> {
    if let Some(nested) = df.get_columns().iter().find(|c| c.dtype().is_nested()) {
        return Err(PolarsError::InvalidOperation(
            format!(
                "cannot compare rows: column '{}' has nested type {}",
                nested.name(),
                nested.dtype()
            )
            .into(),
        ));
    }
    let unique = df
        .clone()
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()?;
    Ok(df.height() - unique.height())
}

pub(crate) fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

fn summarize(series: &Series) -> PolarsResult<ColumnSummary> {
    let column = series.name().to_string();
    let count = series.len() - series.null_count();
    if is_numeric(series.dtype()) {
        let floats = series.cast(&DataType::Float64)?;
        let values = floats.f64()?;
        Ok(ColumnSummary::Numeric {
            column,
            count,
            mean: values.mean(),
            std: values.std(1),
            min: values.min(),
            median: values.median(),
            max: values.max(),
        })
    } else {
        let unique = series.drop_nulls().n_unique()?;
        Ok(ColumnSummary::Categorical {
            column,
            count,
            unique,
        })
    }
}

fn fmt_stat(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.4}", v))
}

impl fmt::Display for ProfileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.name)?;
        writeln!(f, "shape: {} rows x {} columns", self.shape.0, self.shape.1)?;
        for c in &self.columns {
            writeln!(f, "  {:<28} {:<20} nulls={}", c.name, c.dtype.to_string(), c.null_count)?;
        }
        match self.duplicate_rows {
            Some(n) => writeln!(f, "duplicate rows: {}", n)?,
            None => writeln!(f, "duplicate rows: unavailable")?,
        }
        writeln!(f, "summary:")?;
        for s in &self.summary {
            match s {
                ColumnSummary::Numeric {
                    column,
                    count,
                    mean,
                    std,
                    min,
                    median,
                    max,
                } => writeln!(
                    f,
                    "  {:<28} count={} mean={} std={} min={} median={} max={}",
                    column,
                    count,
                    fmt_stat(*mean),
                    fmt_stat(*std),
                    fmt_stat(*min),
                    fmt_stat(*median),
                    fmt_stat(*max)
                )?,
                ColumnSummary::Categorical {
                    column,
                    count,
                    unique,
                } => writeln!(f, "  {:<28} count={} unique={}", column, count, unique)?,
            }
        }
        writeln!(f, "{}", self.head)?;
        for failed in &self.failed_steps {
            match &failed.column {
                Some(col) => writeln!(f, "step {} failed on {}: {}", failed.step, col, failed.message)?,
                None => writeln!(f, "step {} failed: {}", failed.step, failed.message)?,
            }
        }
        Ok(())
    }
}
