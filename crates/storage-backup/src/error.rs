//! Error types for configuration, backup and restore.

use std::io;
use std::path::{Path, PathBuf};

use storage_backup_client::ApiError;
use thiserror::Error;

/// Configuration errors. All of them abort before any network call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY are required")]
    MissingCredentials,

    #[error("Failed to load env file {}: {source}", .path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Failed to list storage buckets: {0}")]
    ListBuckets(#[source] ApiError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid bucket metadata in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsafe path: {0}")]
    UnsafePath(String),
}

impl BackupError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        BackupError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type BackupResult<T> = Result<T, BackupError>;
