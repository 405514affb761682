//! Read-only access to the object storage bucket.

use crate::config::{ConfigError, Credentials};
use crate::datasets::error::DatasetError;
use async_trait::async_trait;
use futures_util::StreamExt;
use log::debug;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Download-only view of one bucket.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    fn bucket(&self) -> &str;

    /// Writes the object at `key` to `local_path`, replacing any existing content.
    async fn download_file(&self, key: &str, local_path: &Path) -> Result<(), DatasetError>;
}

/// S3 session for one bucket, built once from static credentials.
#[derive(Debug)]
pub struct S3Storage {
    bucket: String,
    store: AmazonS3,
}

impl S3Storage {
    /// Builds the session. No request is made until the first download.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Session`] if the client cannot be configured.
    pub fn new(credentials: &Credentials, bucket: &str) -> Result<Self, ConfigError> {
        let store = AmazonS3Builder::new()
            .with_bucket_name(bucket)
            .with_region(credentials.region())
            .with_access_key_id(credentials.access_key_id())
            .with_secret_access_key(credentials.secret_access_key())
            .build()
            .map_err(|e| ConfigError::Session(bucket.to_string(), e))?;
        Ok(Self {
            bucket: bucket.to_string(),
            store,
        })
    }

    fn storage_error(&self, key: &str, source: object_store::Error) -> DatasetError {
        DatasetError::Storage {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            source,
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn download_file(&self, key: &str, local_path: &Path) -> Result<(), DatasetError> {
        let result = self
            .store
            .get(&ObjectPath::from(key))
            .await
            .map_err(|e| self.storage_error(key, e))?;

        let mut file = tokio::fs::File::create(local_path)
            .await
            .map_err(|e| DatasetError::DownloadIo(local_path.to_path_buf(), e))?;

        let mut written = 0usize;
        let mut stream = result.into_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| self.storage_error(key, e))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| DatasetError::DownloadIo(local_path.to_path_buf(), e))?;
            written += chunk.len();
        }
        file.flush()
            .await
            .map_err(|e| DatasetError::DownloadIo(local_path.to_path_buf(), e))?;

        debug!("Wrote {} bytes of s3://{}/{}", written, self.bucket, key);
        Ok(())
    }
}
