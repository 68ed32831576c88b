//! Recursive object listing.

use futures::future::{BoxFuture, FutureExt};
use storage_backup_client::{ApiClient, LIST_PAGE_LIMIT};

use crate::paths::join_prefix;

/// Every file path under `prefix` in `bucket`, depth first in API order.
///
/// Entries without an `id` are folders and are expanded in place. A listing
/// that fails is logged and contributes nothing; the rest of the walk goes on.
/// Only the first page of each folder is read, so folders with more than
/// [`LIST_PAGE_LIMIT`] direct entries are truncated.
pub fn list_all_files<'a>(
    client: &'a ApiClient,
    bucket: &'a str,
    prefix: &'a str,
) -> BoxFuture<'a, Vec<String>> {
    async move {
        let entries = match client.list_objects(bucket, prefix).await {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(
                    bucket = %bucket,
                    prefix = %prefix,
                    status = ?err.status(),
                    error = %err,
                    "Error listing {}/{}",
                    bucket,
                    prefix
                );
                return Vec::new();
            }
        };

        if entries.len() >= LIST_PAGE_LIMIT as usize {
            tracing::warn!(
                bucket = %bucket,
                prefix = %prefix,
                "Listing returned a full page of {} entries; later entries are not backed up",
                LIST_PAGE_LIMIT
            );
        }

        let mut files = Vec::new();
        for entry in entries {
            let path = join_prefix(prefix, &entry.name);
            if entry.is_folder() {
                let nested = list_all_files(client, bucket, &path).await;
                files.extend(nested);
            } else {
                files.push(path);
            }
        }
        files
    }
    .boxed()
}
