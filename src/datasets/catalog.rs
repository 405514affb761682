//! The retail datasets, where they live remotely and where they are cached locally.

use std::fmt;
use std::path::{Path, PathBuf};

/// Bucket holding every dataset.
pub const BUCKET_NAME: &str = "zrive-ds-data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Parquet,
    Csv,
}

impl FileFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Parquet => "parquet",
            FileFormat::Csv => "csv",
        }
    }
}

/// A dataset in the grocery retail bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Orders,
    Regulars,
    AbandonedCart,
    Inventory,
    Users,
    /// Per (order, product) features with a purchase `outcome` label.
    FeatureFrame,
}

impl Dataset {
    pub const fn all() -> &'static [Dataset] {
        &[
            Dataset::Orders,
            Dataset::Regulars,
            Dataset::AbandonedCart,
            Dataset::Inventory,
            Dataset::Users,
            Dataset::FeatureFrame,
        ]
    }

    /// Identifier used in logs, reports and local file names.
    pub fn id(&self) -> &'static str {
        match self {
            Dataset::Orders => "orders",
            Dataset::Regulars => "regulars",
            Dataset::AbandonedCart => "abandoned_cart",
            Dataset::Inventory => "inventory",
            Dataset::Users => "users",
            Dataset::FeatureFrame => "feature_frame",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Dataset::Orders => "Orders",
            Dataset::Regulars => "Regulars",
            Dataset::AbandonedCart => "Abandoned Cart",
            Dataset::Inventory => "Inventory",
            Dataset::Users => "Users",
            Dataset::FeatureFrame => "Feature Frame",
        }
    }

    pub fn remote_key(&self) -> &'static str {
        match self {
            Dataset::Orders => "groceries/sampled-datasets/orders.parquet",
            Dataset::Regulars => "groceries/sampled-datasets/regulars.parquet",
            Dataset::AbandonedCart => "groceries/sampled-datasets/abandoned_carts.parquet",
            Dataset::Inventory => "groceries/sampled-datasets/inventory.parquet",
            Dataset::Users => "groceries/sampled-datasets/users.parquet",
            Dataset::FeatureFrame => "groceries/box_builder_dataset/feature_frame.csv",
        }
    }

    pub fn format(&self) -> FileFormat {
        match self {
            Dataset::FeatureFrame => FileFormat::Csv,
            _ => FileFormat::Parquet,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.id(), self.format().extension())
    }

    pub fn local_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.file_name())
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
