//! Runs download → load → profile → analyse/plot over the retail datasets.

use crate::datasets::analysis;
use crate::datasets::catalog::Dataset;
use crate::datasets::downloader::Downloader;
use crate::datasets::error::DatasetError;
use crate::datasets::loader::load_dataset;
use crate::datasets::profiler::{profile, ProfileReport};
use crate::datasets::storage::ObjectStorage;
use crate::datasets::visualizer::{self, DISCOUNT_PCT, GLOBAL_POPULARITY, NORMALISED_PRICE};
use crate::report::RunReport;
use log::info;
use polars::prelude::DataFrame;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Everything a groceries run produced besides the charts on disk.
#[derive(Debug)]
pub struct GroceriesRun {
    pub report: RunReport,
    pub profiles: Vec<ProfileReport>,
    pub charts: Vec<PathBuf>,
    pub average_order_total: Option<f64>,
    /// Feature frame columns whose nulls were replaced by the column mean.
    pub imputed_columns: Vec<String>,
}

pub struct GroceriesPipeline<'a> {
    storage: &'a dyn ObjectStorage,
    data_dir: PathBuf,
    out_dir: PathBuf,
}

impl<'a> GroceriesPipeline<'a> {
    pub fn new(storage: &'a dyn ObjectStorage, data_dir: &Path, out_dir: &Path) -> Self {
        Self {
            storage,
            data_dir: data_dir.to_path_buf(),
            out_dir: out_dir.to_path_buf(),
        }
    }

    /// Makes every dataset local. A dataset that cannot be downloaded is recorded in
    /// `report` and left out of the returned list.
    pub async fn download_all(&self, report: &mut RunReport) -> Vec<(Dataset, PathBuf)> {
        let downloader = Downloader::new(self.storage);
        let mut available = Vec::with_capacity(Dataset::all().len());
        for &dataset in Dataset::all() {
            match downloader.ensure_dataset(dataset, &self.data_dir).await {
                Ok((_, path)) => available.push((dataset, path)),
                Err(e) => report.record_failure(dataset.id(), e.kind(), &e),
            }
        }
        available
    }

    /// Loads the downloaded datasets.
    ///
    /// # Errors
    ///
    /// Fails on the first file that is present but cannot be read.
    pub async fn load_all(
        &self,
        available: &[(Dataset, PathBuf)],
    ) -> Result<HashMap<Dataset, DataFrame>, DatasetError> {
        let mut frames = HashMap::with_capacity(available.len());
        for (dataset, path) in available {
            let df = load_dataset(*dataset, path).await?;
            frames.insert(*dataset, df);
        }
        Ok(frames)
    }

    /// Runs the whole pipeline.
    ///
    /// # Errors
    ///
    /// Only load failures abort the run. Download, analysis and chart failures are
    /// collected in [`GroceriesRun::report`].
    pub async fn run(&self) -> Result<GroceriesRun, DatasetError> {
        let mut report = RunReport::new("groceries");

        let available = self.download_all(&mut report).await;
        let mut frames = self.load_all(&available).await?;

        let mut profiles = Vec::with_capacity(frames.len());
        for &dataset in Dataset::all() {
            if let Some(df) = frames.get(&dataset) {
                let profile = profile(dataset.display_name(), df);
                info!("\n{}", profile);
                profiles.push(profile);
            }
        }

        let imputed_columns = frames
            .get_mut(&Dataset::FeatureFrame)
            .map(analysis::fill_numeric_nulls_with_mean)
            .unwrap_or_default();

        let mut charts = Vec::new();
        let average_order_total = self.retail_charts(&frames, &mut report, &mut charts);
        self.feature_frame_charts(&frames, &mut report, &mut charts);

        Ok(GroceriesRun {
            report,
            profiles,
            charts,
            average_order_total,
            imputed_columns,
        })
    }

    fn retail_charts(
        &self,
        frames: &HashMap<Dataset, DataFrame>,
        report: &mut RunReport,
        charts: &mut Vec<PathBuf>,
    ) -> Option<f64> {
        let out = self.out_dir.as_path();

        for (dataset, name) in [
            (Dataset::Orders, "Orders"),
            (Dataset::AbandonedCart, "Abandoned Carts"),
        ] {
            record_chart(
                report,
                charts,
                &format!("{}_item_distribution", dataset.id()),
                frame(frames, dataset)
                    .and_then(|df| visualizer::plot_item_distribution(df, name, out)),
            );
        }

        record_chart(
            report,
            charts,
            "abandonment_rate_by_user_type",
            frame(frames, Dataset::AbandonedCart).and_then(|abandoned| {
                let regulars = frame(frames, Dataset::Regulars)?;
                let users = frame(frames, Dataset::Users)?;
                let rates = analysis::abandonment_rate_by_user_type(abandoned, regulars, users)?;
                visualizer::plot_abandonment_rates(&rates, out)
            }),
        );

        let average = match frame(frames, Dataset::Orders).and_then(analysis::average_order_total) {
            Ok(avg) => {
                report.record_success("average_order_total");
                avg
            }
            Err(e) => {
                report.record_failure("average_order_total", e.kind(), &e);
                None
            }
        };

        record_chart(
            report,
            charts,
            "abandoned_carts_by_date",
            frame(frames, Dataset::AbandonedCart)
                .and_then(analysis::abandonment_by_date)
                .and_then(|by_date| visualizer::plot_abandonment_by_date(&by_date, out)),
        );

        average
    }

    fn feature_frame_charts(
        &self,
        frames: &HashMap<Dataset, DataFrame>,
        report: &mut RunReport,
        charts: &mut Vec<PathBuf>,
    ) {
        let out = self.out_dir.as_path();
        let features = || frame(frames, Dataset::FeatureFrame);

        record_chart(
            report,
            charts,
            "outcome_distribution",
            features()
                .and_then(analysis::outcome_counts)
                .and_then(|counts| visualizer::plot_outcome_distribution(&counts, out)),
        );
        record_chart(
            report,
            charts,
            "normalised_price_distribution",
            features()
                .and_then(|df| visualizer::plot_normalised_price(df, out)),
        );
        for (column, title) in [
            (NORMALISED_PRICE, "Normalized Prices"),
            (DISCOUNT_PCT, "Discount (%)"),
            (GLOBAL_POPULARITY, "Global Popularity"),
        ] {
            record_chart(
                report,
                charts,
                &format!("{}_by_outcome", column),
                features()
                    .and_then(|df| visualizer::plot_by_outcome(df, column, title, out)),
            );
        }
        record_chart(
            report,
            charts,
            "ordered_before_vs_outcome",
            features()
                .and_then(analysis::ordered_before_by_outcome)
                .and_then(|counts| visualizer::plot_ordered_before_vs_outcome(&counts, out)),
        );
    }
}

fn frame(frames: &HashMap<Dataset, DataFrame>, dataset: Dataset) -> Result<&DataFrame, DatasetError> {
    frames
        .get(&dataset)
        .ok_or_else(|| DatasetError::Unavailable(dataset.id().to_string()))
}

fn record_chart(
    report: &mut RunReport,
    charts: &mut Vec<PathBuf>,
    name: &str,
    result: Result<PathBuf, DatasetError>,
) {
    match result {
        Ok(path) => {
            report.record_success(name);
            charts.push(path);
        }
        Err(e) => report.record_failure(name, e.kind(), &e),
    }
}
