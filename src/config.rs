//! Environment-driven configuration for object storage access.

use crate::error::FailureKind;
use log::{info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ACCESS_KEY_VAR: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
pub const REGION_VAR: &str = "AWS_REGION";
pub const DEFAULT_REGION: &str = "eu-west-1";
pub const DEFAULT_ENV_FILE: &str = "keys.env";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable {0} is not set. Check the keys.env file")]
    MissingCredential(&'static str),

    #[error("Failed to load environment file '{0}'")]
    EnvFile(PathBuf, #[source] dotenv::Error),

    #[error("Failed to create storage session for bucket '{0}'")]
    Session(String, #[source] object_store::Error),
}

impl ConfigError {
    pub fn kind(&self) -> FailureKind {
        FailureKind::Config
    }
}

/// Static credentials passed through to the storage client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
    region: String,
}

impl Credentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
        }
    }

    /// Reads the credentials from the process environment.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingCredential`] if either key variable is unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the credentials through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::MissingCredential(name))
        };
        let access_key_id = required(ACCESS_KEY_VAR)?;
        let secret_access_key = required(SECRET_KEY_VAR)?;
        let region = lookup(REGION_VAR)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        Ok(Self {
            access_key_id,
            secret_access_key,
            region,
        })
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("region", &self.region)
            .finish()
    }
}

/// Loads variables from `path` into the environment if the file exists.
///
/// Returns whether the file was found. A missing file is only a warning: the
/// variables may already be set in the environment.
pub fn load_env_file(path: &Path) -> Result<bool, ConfigError> {
    let exists = path.is_file();
    info!("Does the {} file exist? {}", path.display(), exists);

    if exists {
        dotenv::from_path(path).map_err(|e| ConfigError::EnvFile(path.to_path_buf(), e))?;
    } else {
        warn!("The {} file was not found.", path.display());
    }
    Ok(exists)
}
