//! One HTML chart per function. Each chart is independent of the others.

use crate::datasets::analysis::{
    self, AbandonmentRate, ABANDONED_CARTS, ABANDON_DATE, COUNT, ORDERED_BEFORE, OUTCOME,
};
use crate::datasets::error::DatasetError;
use log::info;
use plotlars::{BarPlot, BoxPlot, Histogram, Legend, Orientation, Plot, Rgb, Text, TimeSeriesPlot};
use polars::prelude::*;
use std::path::{Path, PathBuf};

pub const NORMALISED_PRICE: &str = "normalised_price";
pub const DISCOUNT_PCT: &str = "discount_pct";
pub const GLOBAL_POPULARITY: &str = "global_popularity";

const ITEM_COUNT: &str = "item_count";
const USER_TYPE: &str = "user_type";
const ABANDONMENT_RATE: &str = "abandonment_rate";
const DATE_LABEL: &str = "date_label";
const OUTCOME_X_TITLE: &str = "Outcome (1 = Purchased, 0 = Not Purchased)";

/// `out_dir` must already exist; see [`crate::ensure_dir_exists`].
fn chart_path(out_dir: &Path, file_stem: &str) -> Result<PathBuf, DatasetError> {
    if !out_dir.is_dir() {
        return Err(DatasetError::ChartOutput(
            out_dir.to_path_buf(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "output directory does not exist"),
        ));
    }
    Ok(out_dir.join(format!("{}.html", file_stem)))
}

fn finish(plot: impl Plot, path: PathBuf) -> PathBuf {
    plot.write_html(path.to_string_lossy().to_string());
    info!("Wrote chart {}", path.display());
    path
}

/// `column` rendered as text so that it can label bars and boxes.
fn with_text_column(df: &DataFrame, column: &str, alias: &str) -> Result<DataFrame, DatasetError> {
    Ok(df
        .clone()
        .lazy()
        .with_column(col(column).cast(DataType::String).alias(alias))
        .collect()?)
}

/// Charts plot values as floats; counts come out of polars as `UInt32`.
fn with_float_column(df: &DataFrame, column: &str) -> Result<DataFrame, DatasetError> {
    Ok(df
        .clone()
        .lazy()
        .with_column(col(column).cast(DataType::Float64))
        .collect()?)
}

fn slug(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

/// Histogram of the number of items per row of `df`.
pub fn plot_item_distribution(
    df: &DataFrame,
    name: &str,
    out_dir: &Path,
) -> Result<PathBuf, DatasetError> {
    let counts = analysis::item_count_distribution(df, name)?;
    let counts: Vec<f64> = counts.into_iter().map(f64::from).collect();
    let data = df!(ITEM_COUNT => counts)?;
    let path = chart_path(out_dir, &format!("{}_item_distribution", slug(name)))?;

    let plot = Histogram::builder()
        .data(&data)
        .x(ITEM_COUNT)
        .colors(vec![Rgb(70, 130, 180)])
        .opacity(0.8)
        .plot_title(Text::from(format!("Distribution of Number of Items in {}", name).as_str()))
        .x_title("Number of Items")
        .y_title("Frequency")
        .build();
    Ok(finish(plot, path))
}

pub fn plot_abandonment_rates(
    rates: &[AbandonmentRate],
    out_dir: &Path,
) -> Result<PathBuf, DatasetError> {
    let labels: Vec<String> = rates.iter().map(|r| r.user_type.to_string()).collect();
    let values: Vec<f64> = rates.iter().map(|r| r.rate).collect();
    let data = df!(USER_TYPE => labels, ABANDONMENT_RATE => values)?;
    let path = chart_path(out_dir, "abandonment_rate_by_user_type")?;

    let plot = BarPlot::builder()
        .data(&data)
        .labels(USER_TYPE)
        .values(ABANDONMENT_RATE)
        .orientation(Orientation::Vertical)
        .colors(vec![Rgb(70, 130, 180)])
        .plot_title("Abandonment Rate of Carts by User Type")
        .x_title("User Type")
        .y_title("Abandonment Rate")
        .build();
    Ok(finish(plot, path))
}

/// Line chart over the output of [`analysis::abandonment_by_date`].
pub fn plot_abandonment_by_date(
    by_date: &DataFrame,
    out_dir: &Path,
) -> Result<PathBuf, DatasetError> {
    let data = with_text_column(by_date, ABANDON_DATE, DATE_LABEL)?;
    let data = with_float_column(&data, ABANDONED_CARTS)?;
    let path = chart_path(out_dir, "abandoned_carts_by_date")?;

    let plot = TimeSeriesPlot::builder()
        .data(&data)
        .x(DATE_LABEL)
        .y(ABANDONED_CARTS)
        .colors(vec![Rgb(200, 60, 60)])
        .plot_title("Number of Abandoned Carts by Date")
        .x_title("Date")
        .y_title("Number of Abandoned Carts")
        .build();
    Ok(finish(plot, path))
}

/// Bar chart over the output of [`analysis::outcome_counts`].
pub fn plot_outcome_distribution(
    counts: &DataFrame,
    out_dir: &Path,
) -> Result<PathBuf, DatasetError> {
    let data = with_text_column(counts, OUTCOME, OUTCOME)?;
    let data = with_float_column(&data, COUNT)?;
    let path = chart_path(out_dir, "outcome_distribution")?;

    let plot = BarPlot::builder()
        .data(&data)
        .labels(OUTCOME)
        .values(COUNT)
        .orientation(Orientation::Vertical)
        .plot_title("Distribution of Purchased/Not Purchased Products")
        .x_title(OUTCOME_X_TITLE)
        .y_title("Frequency")
        .build();
    Ok(finish(plot, path))
}

pub fn plot_normalised_price(df: &DataFrame, out_dir: &Path) -> Result<PathBuf, DatasetError> {
    analysis::require_column(df, "feature_frame", NORMALISED_PRICE)?;
    let data = with_float_column(df, NORMALISED_PRICE)?;
    let path = chart_path(out_dir, "normalised_price_distribution")?;

    let plot = Histogram::builder()
        .data(&data)
        .x(NORMALISED_PRICE)
        .colors(vec![Rgb(70, 130, 180)])
        .opacity(0.8)
        .plot_title("Distribution of Normalized Prices")
        .x_title("Normalized Price")
        .y_title("Frequency")
        .build();
    Ok(finish(plot, path))
}

/// Box plot of `value_column` for each `outcome`.
pub fn plot_by_outcome(
    df: &DataFrame,
    value_column: &str,
    value_title: &str,
    out_dir: &Path,
) -> Result<PathBuf, DatasetError> {
    analysis::require_column(df, "feature_frame", value_column)?;
    analysis::require_column(df, "feature_frame", OUTCOME)?;
    let data = with_text_column(df, OUTCOME, OUTCOME)?;
    let data = with_float_column(&data, value_column)?;
    let path = chart_path(out_dir, &format!("{}_by_outcome", value_column))?;

    let plot = BoxPlot::builder()
        .data(&data)
        .labels(OUTCOME)
        .values(value_column)
        .orientation(Orientation::Vertical)
        .plot_title(Text::from(
            format!("Distribution of {} vs Purchase Outcome", value_title).as_str(),
        ))
        .x_title(OUTCOME_X_TITLE)
        .y_title(value_title)
        .build();
    Ok(finish(plot, path))
}

/// Grouped bars over the output of [`analysis::ordered_before_by_outcome`].
pub fn plot_ordered_before_vs_outcome(
    counts: &DataFrame,
    out_dir: &Path,
) -> Result<PathBuf, DatasetError> {
    let data = with_text_column(counts, ORDERED_BEFORE, ORDERED_BEFORE)?;
    let data = with_text_column(&data, OUTCOME, OUTCOME)?;
    let data = with_float_column(&data, COUNT)?;
    let path = chart_path(out_dir, "ordered_before_vs_outcome")?;

    let plot = BarPlot::builder()
        .data(&data)
        .labels(ORDERED_BEFORE)
        .values(COUNT)
        .group(OUTCOME)
        .orientation(Orientation::Vertical)
        .colors(vec![Rgb(70, 130, 180), Rgb(230, 140, 40)])
        .plot_title("Relationship between Previous Purchase (ordered_before) and Purchase Outcome")
        .x_title("Previously Purchased Product (1 = Yes, 0 = No)")
        .y_title("Frequency")
        .legend_title("outcome")
        .legend(&Legend::new().x(0.85).y(0.95))
        .build();
    Ok(finish(plot, path))
}
