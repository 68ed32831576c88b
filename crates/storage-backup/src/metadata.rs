//! Bucket metadata persisted next to the mirrored objects (`buckets.json`).

use std::path::Path;

use serde::{Deserialize, Serialize};
use storage_backup_client::{Bucket, CreateBucketRequest};
use tokio::fs;

use crate::error::{BackupError, BackupResult};

/// Bucket settings needed to re-create a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketMetadata {
    pub name: String,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub file_size_limit: Option<u64>,
    #[serde(default)]
    pub allowed_mime_types: Option<Vec<String>>,
}

impl BucketMetadata {
    /// Settings used when a backed-up bucket has no metadata record.
    pub fn private(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            public: false,
            file_size_limit: None,
            allowed_mime_types: None,
        }
    }

    pub fn create_request(&self) -> CreateBucketRequest {
        CreateBucketRequest {
            id: self.name.clone(),
            name: self.name.clone(),
            public: self.public,
            file_size_limit: self.file_size_limit,
            allowed_mime_types: self.allowed_mime_types.clone(),
        }
    }
}

impl From<&Bucket> for BucketMetadata {
    fn from(bucket: &Bucket) -> Self {
        Self {
            name: bucket.name.clone(),
            public: bucket.public.unwrap_or(false),
            file_size_limit: bucket.file_size_limit,
            allowed_mime_types: bucket.allowed_mime_types.clone(),
        }
    }
}

/// Write `buckets` as an indented JSON array, replacing any existing file.
pub async fn write_bucket_metadata(path: &Path, buckets: &[BucketMetadata]) -> BackupResult<()> {
    let json = serde_json::to_string_pretty(buckets).map_err(|source| BackupError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json)
        .await
        .map_err(|e| BackupError::io(path, e))?;
    tracing::debug!(path = %path.display(), count = buckets.len(), "Wrote bucket metadata");
    Ok(())
}

pub async fn read_bucket_metadata(path: &Path) -> BackupResult<Vec<BucketMetadata>> {
    let raw = fs::read(path).await.map_err(|e| BackupError::io(path, e))?;
    serde_json::from_slice(&raw).map_err(|source| BackupError::Json {
        path: path.to_path_buf(),
        source,
    })
}
