//! Local mirror layout.
//!
//! Layout: `<backup_dir>/storage/buckets.json` and
//! `<backup_dir>/storage/<bucket>/<object_path>`.

use std::path::{Path, PathBuf};

use crate::error::{BackupError, BackupResult};

pub const STORAGE_DIR: &str = "storage";
pub const BUCKETS_FILE: &str = "buckets.json";

pub fn storage_root(backup_dir: &Path) -> PathBuf {
    backup_dir.join(STORAGE_DIR)
}

pub fn buckets_file(backup_dir: &Path) -> PathBuf {
    storage_root(backup_dir).join(BUCKETS_FILE)
}

/// Full remote path of `name` under `prefix`; no separator for the bucket root.
pub fn join_prefix(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}

/// Directory holding the mirror of `bucket`. The name must be a single safe segment.
pub fn bucket_dir(storage_root: &Path, bucket: &str) -> BackupResult<PathBuf> {
    if bucket.contains('/') || !is_safe_segment(bucket) {
        return Err(BackupError::UnsafePath(format!(
            "bucket name {:?} is not a valid directory name",
            bucket
        )));
    }
    Ok(storage_root.join(bucket))
}

/// Local target for `object_path` inside `bucket_dir`.
///
/// Rejects paths that would resolve outside the bucket directory.
pub fn mirror_path(bucket_dir: &Path, object_path: &str) -> BackupResult<PathBuf> {
    if object_path.starts_with('/') {
        return Err(BackupError::UnsafePath(format!(
            "object path {:?} is absolute",
            object_path
        )));
    }

    let mut path = bucket_dir.to_path_buf();
    let mut segments = 0;
    for segment in object_path.split('/').filter(|s| !s.is_empty()) {
        if !is_safe_segment(segment) {
            return Err(BackupError::UnsafePath(format!(
                "object path {:?} escapes the bucket directory",
                object_path
            )));
        }
        path.push(segment);
        segments += 1;
    }

    if segments == 0 {
        return Err(BackupError::UnsafePath(format!(
            "object path {:?} is empty",
            object_path
        )));
    }
    Ok(path)
}

fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".." && !segment.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_prefix_omits_separator_at_root() {
        assert_eq!(join_prefix("", "a.png"), "a.png");
        assert_eq!(join_prefix("sub", "b.png"), "sub/b.png");
        assert_eq!(join_prefix("a/b", "c"), "a/b/c");
    }

    #[test]
    fn layout() {
        let root = Path::new("/backups");
        assert_eq!(storage_root(root), PathBuf::from("/backups/storage"));
        assert_eq!(
            buckets_file(root),
            PathBuf::from("/backups/storage/buckets.json")
        );
    }

    #[test]
    fn mirror_path_nests_folders() {
        let dir = Path::new("/backups/storage/avatars");
        assert_eq!(
            mirror_path(dir, "a/b/c/leaf.txt").unwrap(),
            PathBuf::from("/backups/storage/avatars/a/b/c/leaf.txt")
        );
        assert_eq!(
            mirror_path(dir, "a//b.png").unwrap(),
            PathBuf::from("/backups/storage/avatars/a/b.png")
        );
    }

    #[test]
    fn mirror_path_rejects_traversal() {
        let dir = Path::new("/backups/storage/avatars");
        for bad in ["../../etc/passwd", "a/../../b", "/etc/passwd", "./x/..", "", "//"] {
            assert!(
                matches!(mirror_path(dir, bad), Err(BackupError::UnsafePath(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn bucket_dir_requires_single_segment() {
        let root = Path::new("/backups/storage");
        assert_eq!(
            bucket_dir(root, "avatars").unwrap(),
            PathBuf::from("/backups/storage/avatars")
        );
        assert!(bucket_dir(root, "..").is_err());
        assert!(bucket_dir(root, "a/b").is_err());
        assert!(bucket_dir(root, "").is_err());
    }
}
