use crate::datasets::catalog::{Dataset, FileFormat};
use crate::datasets::error::DatasetError;
use log::info;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tokio::task;

/// Reads a cached dataset file into a DataFrame on a blocking task.
pub async fn load_dataset(dataset: Dataset, path: &Path) -> Result<DataFrame, DatasetError> {
    let path_buf = path.to_path_buf();
    let df = task::spawn_blocking(move || match dataset.format() {
        FileFormat::Parquet => read_parquet(&path_buf),
        FileFormat::Csv => read_csv(&path_buf),
    })
    .await??;

    info!(
        "Loaded {} with {} rows and {} columns",
        dataset,
        df.height(),
        df.width()
    );
    Ok(df)
}

pub fn read_parquet(path: &Path) -> Result<DataFrame, DatasetError> {
    let file = File::open(path).map_err(|e| DatasetError::LoadIo(path.to_path_buf(), e))?;
    ParquetReader::new(file)
        .finish()
        .map_err(|e| DatasetError::LoadPolars(path.to_path_buf(), e))
}

/// Reads a CSV file with a header row.
pub fn read_csv(path: &Path) -> Result<DataFrame, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::LoadIo(
            path.to_path_buf(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
        ));
    }
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))
        .map_err(|e| DatasetError::LoadPolars(path.to_path_buf(), e))?
        .finish()
        .map_err(|e| DatasetError::LoadPolars(path.to_path_buf(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    #[tokio::test]
    async fn loads_parquet_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.parquet");
        let mut df = df!(
            "user_id" => &["a", "b", "c"],
            "count_people" => &[Some(2.0), None, Some(4.0)],
        )
        .unwrap();
        let file = File::create(&path).unwrap();
        ParquetWriter::new(file).finish(&mut df).unwrap();

        let loaded = load_dataset(Dataset::Users, &path).await.unwrap();

        assert_eq!(loaded.shape(), (3, 2));
        assert!(loaded.equals_missing(&df));
    }

    #[tokio::test]
    async fn loads_csv_dataset_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feature_frame.csv");
        std::fs::write(&path, "variant_id,outcome,normalised_price\n1,0.0,0.5\n2,1.0,\n").unwrap();

        let loaded = load_dataset(Dataset::FeatureFrame, &path).await.unwrap();

        assert_eq!(loaded.shape(), (2, 3));
        let price = loaded.column("normalised_price").unwrap();
        assert_eq!(price.null_count(), 1);
    }

    #[tokio::test]
    async fn corrupt_parquet_is_a_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.parquet");
        std::fs::write(&path, b"definitely not parquet").unwrap();

        let err = load_dataset(Dataset::Orders, &path).await.unwrap_err();

        assert!(matches!(err, DatasetError::LoadPolars(..)));
        assert_eq!(err.kind(), FailureKind::Load);
    }

    #[test]
    fn missing_file_is_a_load_failure() {
        let err = read_parquet(Path::new("/nonexistent/inventory.parquet")).unwrap_err();
        assert!(matches!(err, DatasetError::LoadIo(..)));
        let err = read_csv(Path::new("/nonexistent/feature_frame.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::LoadIo(..)));
    }
}
