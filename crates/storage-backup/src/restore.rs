//! Restore a local mirror back into storage.
//!
//! Every directory under `<backup_dir>/storage` is a bucket. Missing buckets
//! are created from `buckets.json`, then every file is uploaded with upsert.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use storage_backup_client::ApiClient;
use tokio::fs;
use walkdir::WalkDir;

use crate::content_type::content_type_for;
use crate::error::{BackupError, BackupResult};
use crate::metadata::{read_bucket_metadata, BucketMetadata};
use crate::paths::{self, BUCKETS_FILE};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    pub buckets: usize,
    pub total_files: usize,
    pub uploaded_files: usize,
}

impl fmt::Display for RestoreSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} files uploaded",
            self.uploaded_files, self.total_files
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// No `storage` directory under the backup root.
    NoBackup,
    Completed(RestoreSummary),
}

/// A mirrored file and the object path it restores to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalObject {
    pub full_path: PathBuf,
    pub object_path: String,
}

pub async fn run_restore(client: &ApiClient, backup_dir: &Path) -> BackupResult<RestoreOutcome> {
    let storage_dir = paths::storage_root(backup_dir);
    if !fs::try_exists(&storage_dir)
        .await
        .map_err(|e| BackupError::io(&storage_dir, e))?
    {
        println!("No storage backup found at: {}", storage_dir.display());
        return Ok(RestoreOutcome::NoBackup);
    }

    let buckets_file = paths::buckets_file(backup_dir);
    let metadata = if fs::try_exists(&buckets_file)
        .await
        .map_err(|e| BackupError::io(&buckets_file, e))?
    {
        read_bucket_metadata(&buckets_file).await?
    } else {
        Vec::new()
    };

    let bucket_names = local_bucket_names(&storage_dir).await?;
    println!(
        "Found {} bucket(s) to restore: {}",
        bucket_names.len(),
        bucket_names.join(", ")
    );

    let existing: HashSet<String> = match client.list_buckets().await {
        Ok(buckets) => buckets.into_iter().map(|b| b.name).collect(),
        Err(err) => {
            tracing::warn!(error = %err, "Error listing buckets; assuming none exist");
            HashSet::new()
        }
    };

    let mut summary = RestoreSummary::default();
    for name in &bucket_names {
        println!("\nRestoring bucket: {}", name);

        if existing.contains(name) {
            println!("  Bucket already exists: {}", name);
        } else {
            let settings = metadata
                .iter()
                .find(|m| &m.name == name)
                .cloned()
                .unwrap_or_else(|| BucketMetadata::private(name.as_str()));
            println!("  Creating bucket: {} (public: {})", name, settings.public);

            if let Err(err) = client.create_bucket(&settings.create_request()).await {
                tracing::warn!(bucket = %name, error = %err, "Error creating bucket {}", name);
                continue;
            }
        }

        let files = local_objects(&storage_dir.join(name));
        summary.total_files += files.len();
        println!("  Found {} file(s) to upload", files.len());

        for file in &files {
            if upload_file(client, name, file).await {
                summary.uploaded_files += 1;
                println!("  Uploaded: {}", file.object_path);
            }
        }
        summary.buckets += 1;
    }

    println!("\nStorage restore complete: {}", summary);
    Ok(RestoreOutcome::Completed(summary))
}

async fn upload_file(client: &ApiClient, bucket: &str, file: &LocalObject) -> bool {
    let data = match fs::read(&file.full_path).await {
        Ok(data) => data,
        Err(err) => {
            tracing::warn!(path = %file.full_path.display(), error = %err, "Error reading file");
            return false;
        }
    };

    let content_type = content_type_for(&file.object_path);
    match client
        .upload_object(bucket, &file.object_path, data, content_type, true)
        .await
    {
        Ok(key) => {
            tracing::debug!(bucket = %bucket, key = %key, content_type, "Uploaded object");
            true
        }
        Err(err) => {
            tracing::warn!(
                bucket = %bucket,
                path = %file.object_path,
                status = ?err.status(),
                error = %err,
                "Error uploading {}",
                file.object_path
            );
            false
        }
    }
}

/// Names of the bucket directories directly under `storage_dir`, sorted.
pub async fn local_bucket_names(storage_dir: &Path) -> BackupResult<Vec<String>> {
    let mut entries = fs::read_dir(storage_dir)
        .await
        .map_err(|e| BackupError::io(storage_dir, e))?;

    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| BackupError::io(storage_dir, e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| BackupError::io(&entry.path(), e))?;
        if !file_type.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => tracing::warn!(name = ?raw, "Skipping bucket directory with non UTF-8 name"),
        }
    }
    names.sort();
    Ok(names)
}

/// Every file under `bucket_dir` with its `/`-separated object path.
///
/// Files named `buckets.json` are metadata, not objects, and are skipped.
pub fn local_objects(bucket_dir: &Path) -> Vec<LocalObject> {
    let mut objects = Vec::new();
    for entry in WalkDir::new(bucket_dir).min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "Error walking backup directory");
                continue;
            }
        };
        if !entry.file_type().is_file() || entry.file_name() == BUCKETS_FILE {
            continue;
        }

        let relative = match entry.path().strip_prefix(bucket_dir) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        let segments: Option<Vec<&str>> = relative.iter().map(|s| s.to_str()).collect();
        match segments {
            Some(segments) => objects.push(LocalObject {
                full_path: entry.path().to_path_buf(),
                object_path: segments.join("/"),
            }),
            None => {
                tracing::warn!(path = %entry.path().display(), "Skipping file with non UTF-8 path")
            }
        }
    }
    objects
}
