//! Full storage backup: bucket metadata plus a mirror of every object.

use std::fmt;
use std::path::Path;

use storage_backup_client::ApiClient;
use tokio::fs;

use crate::downloader::download_object;
use crate::error::{BackupError, BackupResult};
use crate::lister::list_all_files;
use crate::metadata::{write_bucket_metadata, BucketMetadata};
use crate::paths;

/// Counters of one backup run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackupSummary {
    pub buckets: usize,
    pub total_files: usize,
    pub downloaded_files: usize,
}

impl fmt::Display for BackupSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} files downloaded",
            self.downloaded_files, self.total_files
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupOutcome {
    /// The project has no buckets; nothing was written.
    NoBuckets,
    Completed(BackupSummary),
}

/// Mirror every bucket of the project under `<backup_dir>/storage`.
///
/// Requests run one after another. Per-object failures are logged and
/// counted; only a failed bucket listing or a local write of the storage
/// root or `buckets.json` aborts the run.
pub async fn run_backup(client: &ApiClient, backup_dir: &Path) -> BackupResult<BackupOutcome> {
    println!("Fetching storage buckets...");
    let buckets = client
        .list_buckets()
        .await
        .map_err(BackupError::ListBuckets)?;

    if buckets.is_empty() {
        println!("No storage buckets found.");
        return Ok(BackupOutcome::NoBuckets);
    }

    let storage_dir = paths::storage_root(backup_dir);
    fs::create_dir_all(&storage_dir)
        .await
        .map_err(|e| BackupError::io(&storage_dir, e))?;

    let metadata: Vec<BucketMetadata> = buckets.iter().map(BucketMetadata::from).collect();
    write_bucket_metadata(&paths::buckets_file(backup_dir), &metadata).await?;

    let names: Vec<&str> = buckets.iter().map(|b| b.name.as_str()).collect();
    println!("Found {} bucket(s): {}", buckets.len(), names.join(", "));

    let mut summary = BackupSummary::default();
    for bucket in &buckets {
        println!("\nProcessing bucket: {}", bucket.name);

        let bucket_dir = match paths::bucket_dir(&storage_dir, &bucket.name) {
            Ok(dir) => dir,
            Err(err) => {
                tracing::warn!(bucket = %bucket.name, error = %err, "Skipping bucket");
                continue;
            }
        };
        if let Err(err) = fs::create_dir_all(&bucket_dir).await {
            tracing::warn!(
                bucket = %bucket.name,
                path = %bucket_dir.display(),
                error = %err,
                "Failed to create bucket directory"
            );
        }

        let files = list_all_files(client, &bucket.name, "").await;
        summary.total_files += files.len();
        println!("  Found {} file(s)", files.len());

        for file_path in &files {
            let target = match paths::mirror_path(&bucket_dir, file_path) {
                Ok(target) => target,
                Err(err) => {
                    tracing::warn!(bucket = %bucket.name, path = %file_path, error = %err, "Skipping object");
                    continue;
                }
            };

            if download_object(client, &bucket.name, file_path, &target).await {
                summary.downloaded_files += 1;
                println!("  Downloaded: {}", file_path);
            }
        }
        summary.buckets += 1;
    }

    println!("\nStorage backup complete: {}", summary);
    Ok(BackupOutcome::Completed(summary))
}
