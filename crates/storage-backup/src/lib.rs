//! Backup and restore of Supabase Storage buckets to a local directory tree.

pub mod backup;
pub mod config;
pub mod content_type;
pub mod downloader;
pub mod error;
pub mod lister;
pub mod metadata;
pub mod paths;
pub mod restore;

pub use backup::{run_backup, BackupOutcome, BackupSummary};
pub use config::{load_env_file, BackupConfig, EnvFileReport};
pub use error::{BackupError, ConfigError};
pub use restore::{run_restore, RestoreOutcome, RestoreSummary};

/// Initialize tracing for the CLI binary.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
