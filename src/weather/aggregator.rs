//! Monthly means of an observation table.

use crate::types::daily_variable::{DailyVariable, DATE_COLUMN};
use crate::types::month::Month;
use crate::weather::error::WeatherError;
use crate::weather::reshaper::ObservationTable;
use polars::prelude::*;

pub const YEAR_COLUMN: &str = "year";
pub const MONTH_COLUMN: &str = "month";

/// Per-month means of every observation column.
///
/// Columns are `year` (`i32`), `month` (`u32`, 1-12) and one mean column per
/// [`DailyVariable`], sorted chronologically. An aggregate of an empty table is
/// itself empty, which callers treat as "nothing to show".
#[derive(Debug, Clone)]
pub struct MonthlyAggregate {
    frame: DataFrame,
}

impl MonthlyAggregate {
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// The month each row describes, in row order.
    pub fn months(&self) -> PolarsResult<Vec<Month>> {
        let years = self.frame.column(YEAR_COLUMN)?.as_materialized_series().i32()?;
        let months = self.frame.column(MONTH_COLUMN)?.as_materialized_series().u32()?;
        Ok(years
            .into_iter()
            .zip(months)
            .filter_map(|(year, month)| Some(Month(year?, month?)))
            .collect())
    }

    /// The monthly means of one variable, in row order.
    pub fn means(&self, variable: DailyVariable) -> PolarsResult<Vec<Option<f64>>> {
        Ok(self
            .frame
            .column(variable.column_name())?
            .as_materialized_series()
            .f64()?
            .into_iter()
            .collect())
    }
}

/// Groups the table by calendar month and takes the mean of each variable.
///
/// # Errors
///
/// Returns [`WeatherError::DataFrameProcessing`] if the lazy query fails to run.
pub fn aggregate_monthly(table: &ObservationTable) -> Result<MonthlyAggregate, WeatherError> {
    let means: Vec<Expr> = DailyVariable::all()
        .iter()
        .map(|v| col(v.column_name()).mean())
        .collect();

    let frame = table
        .frame()
        .clone()
        .lazy()
        .with_columns([
            col(DATE_COLUMN).dt().year().alias(YEAR_COLUMN),
            col(DATE_COLUMN)
                .dt()
                .month()
                .cast(DataType::UInt32)
                .alias(MONTH_COLUMN),
        ])
        .group_by([col(YEAR_COLUMN), col(MONTH_COLUMN)])
        .agg(means)
        .sort([YEAR_COLUMN, MONTH_COLUMN], SortMultipleOptions::default())
        .collect()?;

    Ok(MonthlyAggregate { frame })
}
