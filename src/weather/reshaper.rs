//! Turns a validated daily series into a date-indexed observation table.

use crate::types::daily_variable::{DailyVariable, DATE_COLUMN};
use crate::weather::error::{ReshapeError, WeatherError};
use crate::weather::series::DailySeries;
use chrono::NaiveDate;
use log::debug;
use polars::prelude::*;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Daily observations for one location.
///
/// The wrapped frame has a `date` column of dtype `Date` followed by one `f64`
/// column per [`DailyVariable`] (`temperature`, `precipitation`, `wind_speed`), one
/// row per day, in the order the API returned them.
#[derive(Debug, Clone)]
pub struct ObservationTable {
    frame: DataFrame,
}

impl ObservationTable {
    /// A table with the observation schema and no rows.
    pub fn empty() -> PolarsResult<Self> {
        let frame = df!(
            DATE_COLUMN => Vec::<NaiveDate>::new(),
            DailyVariable::TemperatureMean.column_name() => Vec::<f64>::new(),
            DailyVariable::PrecipitationSum.column_name() => Vec::<f64>::new(),
            DailyVariable::WindSpeedMax.column_name() => Vec::<f64>::new(),
        )?;
        Ok(Self { frame })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }
}

/// Builds the observation table for a series.
///
/// The `time` strings become calendar dates and every variable array becomes a
/// column, zipped by position.
///
/// # Errors
///
/// * [`ReshapeError::LengthMismatch`] if a variable array is not exactly as long as
///   `time`. Nothing is truncated.
/// * [`ReshapeError::InvalidDate`] if a `time` entry is not a `YYYY-MM-DD` date.
pub fn reshape(series: &DailySeries) -> Result<ObservationTable, WeatherError> {
    let expected = series.len();
    for variable in DailyVariable::all() {
        let found = series.numbers(*variable).len();
        if found != expected {
            return Err(ReshapeError::LengthMismatch {
                variable: variable.api_name().to_string(),
                expected,
                found,
            }
            .into());
        }
    }

    let dates = series
        .time
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| ReshapeError::InvalidDate {
                index,
                value: raw.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let frame = df!(
        DATE_COLUMN => dates.as_slice(),
        DailyVariable::TemperatureMean.column_name() => series.values(DailyVariable::TemperatureMean),
        DailyVariable::PrecipitationSum.column_name() => series.values(DailyVariable::PrecipitationSum),
        DailyVariable::WindSpeedMax.column_name() => series.values(DailyVariable::WindSpeedMax),
    )?;

    debug!("Reshaped {} days into an observation table", dates.len());
    Ok(ObservationTable { frame })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn two_day_series() -> DailySeries {
        serde_json::from_value(json!({
            "time": ["2010-01-01", "2010-01-02"],
            "temperature_2m_mean": [10.0, 12.0],
            "precipitation_sum": [0.5, 1.0],
            "wind_speed_10m_max": [3.0, 5.0],
        }))
        .unwrap()
    }

    #[test]
    fn reshapes_two_days() -> Result<(), Box<dyn std::error::Error>> {
        let table = reshape(&two_day_series())?;
        let df = table.frame();

        assert_eq!(df.shape(), (2, 4));
        assert_eq!(df.column(DATE_COLUMN)?.dtype(), &DataType::Date);

        let dates: Vec<_> = df
            .column(DATE_COLUMN)?
            .as_materialized_series()
            .date()?
            .as_date_iter()
            .collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2010, 1, 1),
                NaiveDate::from_ymd_opt(2010, 1, 2)
            ]
        );

        let temperature: Vec<_> = df
            .column("temperature")?
            .as_materialized_series()
            .f64()?
            .into_no_null_iter()
            .collect();
        assert_eq!(temperature, vec![10.0, 12.0]);

        let precipitation: Vec<_> = df
            .column("precipitation")?
            .as_materialized_series()
            .f64()?
            .into_no_null_iter()
            .collect();
        assert_eq!(precipitation, vec![0.5, 1.0]);

        let wind: Vec<_> = df
            .column("wind_speed")?
            .as_materialized_series()
            .f64()?
            .into_no_null_iter()
            .collect();
        assert_eq!(wind, vec![3.0, 5.0]);
        Ok(())
    }

    #[test]
    fn reshape_is_pure() -> Result<(), Box<dyn std::error::Error>> {
        let series = two_day_series();
        let first = reshape(&series)?;
        let second = reshape(&series)?;
        assert!(first.frame().equals(second.frame()));
        Ok(())
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let mut series = two_day_series();
        series.wind_speed_max.pop();

        let err = reshape(&series).unwrap_err();
        assert!(matches!(
            err,
            WeatherError::Reshape(ReshapeError::LengthMismatch { expected: 2, found: 1, ref variable })
                if variable == "wind_speed_10m_max"
        ));
    }

    #[test]
    fn rejects_unparseable_dates() {
        let mut series = two_day_series();
        series.time[1] = "02/01/2010".into();

        let err = reshape(&series).unwrap_err();
        assert!(matches!(
            err,
            WeatherError::Reshape(ReshapeError::InvalidDate { index: 1, .. })
        ));
    }

    #[test]
    fn empty_table_has_observation_schema() -> PolarsResult<()> {
        let table = ObservationTable::empty()?;
        assert!(table.is_empty());
        assert_eq!(table.frame().width(), 4);
        Ok(())
    }
}
