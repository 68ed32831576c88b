//! storage-backup: mirror Supabase Storage buckets to local disk.
//!
//! Reads SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY (optionally from an env
//! file) and writes under BACKUP_DIR (default `backups/storage`).

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use storage_backup::config::DEFAULT_ENV_FILE;
use storage_backup::{
    init_tracing, load_env_file, run_backup, run_restore, BackupConfig, BackupError,
};

#[derive(Parser)]
#[command(name = "storage-backup", about = "Back up and restore Supabase Storage buckets")]
struct Cli {
    /// KEY=VALUE file loaded into the environment before reading settings
    #[arg(long, global = true, default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,

    /// Backup root directory (overrides BACKUP_DIR)
    #[arg(long, global = true)]
    backup_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Download bucket metadata and every object (default)
    Backup,
    /// Re-create missing buckets and upload every backed-up object
    Restore,
}

/// Print to stdout and exit with status 1.
fn fail(message: impl std::fmt::Display) -> ! {
    println!("Error: {}", message);
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG may come from the env file, so tracing starts after it loads.
    let env_report = match load_env_file(&cli.env_file) {
        Ok(report) => report,
        Err(err) => fail(err),
    };
    init_tracing();

    if let Some(report) = env_report {
        for (text, position) in &report.skipped {
            tracing::warn!(
                path = %cli.env_file.display(),
                position,
                "Skipping unparseable env file line: {}",
                text
            );
        }
        tracing::debug!(loaded = report.loaded, "Loaded env file");
    }

    let mut config = match BackupConfig::from_env() {
        Ok(config) => config,
        Err(err) => fail(err),
    };
    if let Some(dir) = cli.backup_dir {
        config.backup_dir = dir;
    }
    tracing::debug!(?config, "Loaded configuration");

    let client = config
        .client()
        .context("Failed to create storage API client")?;

    match cli.command.unwrap_or(Commands::Backup) {
        Commands::Backup => match run_backup(&client, &config.backup_dir).await {
            Ok(_) => {}
            Err(BackupError::ListBuckets(err)) => {
                tracing::error!(status = ?err.status(), error = %err, "API Error");
                println!("No storage buckets found or error fetching buckets.");
                std::process::exit(1);
            }
            Err(err) => return Err(err).context("Storage backup failed"),
        },
        Commands::Restore => {
            run_restore(&client, &config.backup_dir)
                .await
                .context("Storage restore failed")?;
        }
    }

    Ok(())
}
