use crate::error::PipelineError;
use log::info;
use std::io;
use std::path::{Path, PathBuf};

const DATA_DIR_NAME: &str = "meteo_eda";

/// Default location for cached datasets: `<system cache dir>/meteo_eda`.
pub fn get_data_dir() -> Result<PathBuf, PipelineError> {
    dirs::cache_dir()
        .ok_or(PipelineError::DataDirResolution)
        .map(|p| p.join(DATA_DIR_NAME))
}

pub async fn ensure_dir_exists(path: &Path) -> Result<(), PipelineError> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(PipelineError::DirCreation(
                    path.to_path_buf(),
                    io::Error::new(io::ErrorKind::AlreadyExists, "path exists but is not a directory"),
                ));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating directory: {}", path.display());
            tokio::fs::create_dir_all(path)
                .await
                .map_err(|e| PipelineError::DirCreation(path.to_path_buf(), e))
        }
        Err(e) => Err(PipelineError::DirCreation(path.to_path_buf(), e)),
    }
}
