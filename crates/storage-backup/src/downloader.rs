//! Single-object download into the local mirror.

use std::path::Path;

use storage_backup_client::ApiClient;
use tokio::fs;

use crate::error::{BackupError, BackupResult};

/// Fetch `object_path` from `bucket` and write it to `target`.
///
/// Parent directories are created and an existing file is overwritten.
/// Returns `false` after logging when either the fetch or the write fails.
pub async fn download_object(
    client: &ApiClient,
    bucket: &str,
    object_path: &str,
    target: &Path,
) -> bool {
    match fetch_to_file(client, bucket, object_path, target).await {
        Ok(size) => {
            tracing::debug!(
                bucket = %bucket,
                path = %object_path,
                target = %target.display(),
                size,
                "Downloaded object"
            );
            true
        }
        Err(err) => {
            let status = match &err {
                BackupError::Api(api) => api.status().map(|s| s.as_u16()),
                _ => None,
            };
            tracing::warn!(
                bucket = %bucket,
                path = %object_path,
                status = ?status,
                error = %err,
                "Error downloading {}",
                object_path
            );
            false
        }
    }
}

async fn fetch_to_file(
    client: &ApiClient,
    bucket: &str,
    object_path: &str,
    target: &Path,
) -> BackupResult<usize> {
    let data = client.fetch_object(bucket, object_path).await?;

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| BackupError::io(parent, e))?;
    }
    fs::write(target, &data)
        .await
        .map_err(|e| BackupError::io(target, e))?;

    Ok(data.len())
}
