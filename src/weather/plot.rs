//! Renders monthly aggregates as HTML time series charts.

use crate::types::daily_variable::DailyVariable;
use crate::types::location::City;
use crate::types::period::DateRange;
use crate::weather::aggregator::MonthlyAggregate;
use crate::weather::error::WeatherError;
use chrono::Datelike;
use log::info;
use plotlars::{Axis, AxisSide, Legend, Line, Plot, Rgb, Shape, Text, TimeSeriesPlot};
use polars::prelude::*;
use std::path::{Path, PathBuf};

const LABEL_COLUMN: &str = "label";

/// Plots the monthly means of one city to `<out_dir>/<city>_monthly.html`.
///
/// Temperature is drawn against the left axis; wind speed and precipitation share
/// the right one. `out_dir` must already exist.
///
/// Returns `Ok(None)` without writing anything when the aggregate is empty.
pub fn plot_monthly(
    aggregate: &MonthlyAggregate,
    city: &City,
    period: &DateRange,
    out_dir: &Path,
) -> Result<Option<PathBuf>, WeatherError> {
    if aggregate.is_empty() {
        info!("No monthly data to plot for {}", city.name);
        return Ok(None);
    }

    let labels: Vec<String> = aggregate.months()?.iter().map(ToString::to_string).collect();
    let mut data = aggregate.frame().clone();
    data.with_column(Column::new(LABEL_COLUMN.into(), labels))?;

    if !out_dir.is_dir() {
        return Err(WeatherError::ChartOutput(
            out_dir.to_path_buf(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "output directory does not exist"),
        ));
    }
    let path = out_dir.join(format!("{}_monthly.html", city.slug()));

    let title = format!(
        "Monthly Weather Data for {} ({}-{})",
        city.name,
        period.start().year(),
        period.end().year()
    );

    TimeSeriesPlot::builder()
        .data(&data)
        .x(LABEL_COLUMN)
        .y(DailyVariable::TemperatureMean.column_name())
        .additional_series(vec![
            DailyVariable::WindSpeedMax.column_name(),
            DailyVariable::PrecipitationSum.column_name(),
        ])
        .size(8)
        .colors(vec![Rgb(220, 40, 40), Rgb(40, 160, 60), Rgb(40, 90, 220)])
        .lines(vec![Line::Solid, Line::Dash, Line::Solid])
        .with_shape(true)
        .shapes(vec![Shape::Circle, Shape::Square, Shape::Cross])
        .plot_title(Text::from(title.as_str()).size(16))
        .legend(&Legend::new().x(0.05).y(0.95))
        .x_title("Date")
        .y_title(Text::from(DailyVariable::TemperatureMean.label()).color(Rgb(220, 40, 40)))
        .y_title2(Text::from(
            format!(
                "{} / {}",
                DailyVariable::WindSpeedMax.label(),
                DailyVariable::PrecipitationSum.label()
            )
            .as_str(),
        ))
        .y_axis(&Axis::new().value_color(Rgb(220, 40, 40)).show_grid(false))
        .y_axis2(&Axis::new().axis_side(AxisSide::Right).show_grid(false))
        .build()
        .write_html(path.to_string_lossy().to_string());

    info!("Wrote {} chart to {}", city.name, path.display());
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::location::LatLon;
    use crate::weather::aggregator::aggregate_monthly;
    use crate::weather::reshaper::{reshape, ObservationTable};
    use crate::weather::series::DailySeries;
    use serde_json::json;
    use chrono::NaiveDate;

    #[test]
    fn empty_aggregate_writes_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let aggregate = aggregate_monthly(&ObservationTable::empty()?)?;
        let period = DateRange::new(
            NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
        )?;
        let city = City::new("Madrid", LatLon(40.416775, -3.703790));

        let written = plot_monthly(&aggregate, &city, &period, dir.path())?;
        assert!(written.is_none());
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
        Ok(())
    }

    #[test]
    fn writes_chart_into_existing_directory() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let series: DailySeries = serde_json::from_value(json!({
            "time": ["2010-01-01", "2010-01-02", "2010-02-01"],
            "temperature_2m_mean": [10.0, 12.0, 6],
            "precipitation_sum": [0, 1.5, 2],
            "wind_speed_10m_max": [3.0, 5.0, 9.0],
        }))?;
        let aggregate = aggregate_monthly(&reshape(&series)?)?;
        let period = DateRange::new(
            NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2010, 2, 28).unwrap(),
        )?;
        let city = City::new("Rio", LatLon(-22.906847, -43.172896));

        let written = plot_monthly(&aggregate, &city, &period, dir.path())?;

        assert_eq!(written, Some(dir.path().join("rio_monthly.html")));
        assert!(std::fs::read_to_string(dir.path().join("rio_monthly.html"))?.contains("<html"));

        let missing = dir.path().join("missing");
        let err = plot_monthly(&aggregate, &city, &period, &missing).unwrap_err();
        assert!(matches!(err, WeatherError::ChartOutput(..)));
        Ok(())
    }
}
