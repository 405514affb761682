//! Cache-aware dataset downloads.

use crate::datasets::catalog::Dataset;
use crate::datasets::error::DatasetError;
use crate::datasets::storage::ObjectStorage;
use log::{info, warn};
use std::path::{Path, PathBuf};
use tokio::fs;

/// How [`Downloader::ensure_local`] satisfied a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// The file was already on disk; storage was not contacted.
    Hit,
    /// The file was fetched from storage.
    Downloaded,
}

/// Makes remote datasets available on local disk, downloading each at most once.
///
/// A local file is trusted as long as it exists; there is no invalidation.
pub struct Downloader<'a> {
    storage: &'a dyn ObjectStorage,
}

impl<'a> Downloader<'a> {
    pub fn new(storage: &'a dyn ObjectStorage) -> Self {
        Self { storage }
    }

    /// Ensures `remote_key` is present at `local_path`.
    ///
    /// The object is first written to a temporary file next to `local_path` and
    /// renamed into place once complete, so an interrupted download never leaves a
    /// file behind that a later call would take for a cache hit.
    ///
    /// # Errors
    ///
    /// Storage and I/O failures are returned as is; nothing is retried.
    pub async fn ensure_local(
        &self,
        dataset_id: &str,
        remote_key: &str,
        local_path: &Path,
    ) -> Result<CacheStatus, DatasetError> {
        if fs::metadata(local_path).await.is_ok_and(|m| m.is_file()) {
            info!(
                "The file {} already exists, proceeding to load it.",
                local_path.display()
            );
            return Ok(CacheStatus::Hit);
        }

        warn!(
            "Cache miss for {}. Downloading s3://{}/{}",
            dataset_id,
            self.storage.bucket(),
            remote_key
        );

        let dir = match local_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| DatasetError::DirCreation(dir.clone(), e))?;

        let partial = tempfile::Builder::new()
            .prefix(".partial-")
            .tempfile_in(&dir)
            .map_err(|e| DatasetError::DownloadIo(local_path.to_path_buf(), e))?;

        self.storage.download_file(remote_key, partial.path()).await?;

        partial
            .persist(local_path)
            .map_err(|e| DatasetError::DownloadIo(local_path.to_path_buf(), e.error))?;
        info!("Downloaded {} to {}", remote_key, local_path.display());
        Ok(CacheStatus::Downloaded)
    }

    /// [`Self::ensure_local`] for a catalog dataset, cached under `data_dir`.
    pub async fn ensure_dataset(
        &self,
        dataset: Dataset,
        data_dir: &Path,
    ) -> Result<(CacheStatus, PathBuf), DatasetError> {
        let local_path = dataset.local_path(data_dir);
        let status = self
            .ensure_local(dataset.id(), dataset.remote_key(), &local_path)
            .await?;
        Ok((status, local_path))
    }
}
