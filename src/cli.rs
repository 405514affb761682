//! Command line interface.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::info;
use meteo_eda::{
    ensure_dir_exists, get_data_dir, load_env_file, City, Credentials, DateRange,
    GroceriesPipeline, OpenMeteoClient, S3Storage, WeatherPipeline, BUCKET_NAME,
    DEFAULT_ENV_FILE, DEFAULT_TIMEZONE,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch daily weather for the default cities and plot monthly means
    Weather {
        /// First day of the period (YYYY-MM-DD)
        #[arg(long, default_value = "2010-01-01")]
        start: NaiveDate,
        /// Last day of the period, inclusive (YYYY-MM-DD)
        #[arg(long, default_value = "2020-12-31")]
        end: NaiveDate,
        #[arg(long, default_value = DEFAULT_TIMEZONE)]
        timezone: String,
        /// Directory the charts are written to
        #[arg(long, default_value = "charts")]
        out: PathBuf,
    },
    /// Download, profile and plot the grocery datasets
    Groceries {
        /// Where datasets are cached (defaults to the system cache directory)
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long, default_value = "charts")]
        out: PathBuf,
        /// Environment file holding the storage credentials
        #[arg(long, default_value = DEFAULT_ENV_FILE)]
        env_file: PathBuf,
    },
}

pub async fn weather(start: NaiveDate, end: NaiveDate, timezone: &str, out: &Path) -> Result<()> {
    let period = DateRange::new(start, end)?;
    ensure_dir_exists(out).await?;

    let client = OpenMeteoClient::new();
    let pipeline = WeatherPipeline::new(&client, period, out).with_timezone(timezone);
    let (report, outcomes) = pipeline.run(&City::default_catalog()).await;

    for outcome in &outcomes {
        match &outcome.chart {
            Some(chart) => info!(
                "{}: {} days, {} months, chart at {}",
                outcome.city,
                outcome.days,
                outcome.months,
                chart.display()
            ),
            None => info!("{}: no data to plot", outcome.city),
        }
    }
    report.log_summary();
    Ok(())
}

pub async fn groceries(data_dir: Option<PathBuf>, out: &Path, env_file: &Path) -> Result<()> {
    load_env_file(env_file)?;
    let credentials = Credentials::from_env()?;
    let storage = S3Storage::new(&credentials, BUCKET_NAME)?;

    let data_dir = match data_dir {
        Some(dir) => dir,
        None => get_data_dir()?,
    };
    ensure_dir_exists(&data_dir).await?;
    ensure_dir_exists(out).await?;

    let run = GroceriesPipeline::new(&storage, &data_dir, out)
        .run()
        .await
        .context("Failed to load data")?;

    if let Some(avg) = run.average_order_total {
        info!("Average order total: {:.2}", avg);
    }
    if !run.imputed_columns.is_empty() {
        info!("Filled missing values in: {}", run.imputed_columns.join(", "));
    }
    info!("{} charts written to {}", run.charts.len(), out.display());
    run.report.log_summary();
    Ok(())
}
