//! Configuration module
//!
//! Settings come from the process environment, optionally seeded from a
//! `KEY=VALUE` env file whose values override variables already set.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use storage_backup_client::{ApiClient, ApiResult};

use crate::error::ConfigError;

pub const DEFAULT_ENV_FILE: &str = ".env";
pub const DEFAULT_BACKUP_DIR: &str = "backups/storage";

pub const SUPABASE_URL_VAR: &str = "SUPABASE_URL";
pub const SERVICE_KEY_VAR: &str = "SUPABASE_SERVICE_ROLE_KEY";
pub const BACKUP_DIR_VAR: &str = "BACKUP_DIR";
pub const REQUEST_TIMEOUT_VAR: &str = "STORAGE_REQUEST_TIMEOUT_SECS";

/// What [`load_env_file`] did with an env file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnvFileReport {
    /// Variables set in the process environment.
    pub loaded: usize,
    /// Unparseable input as reported by dotenvy: `(text, error position)`.
    pub skipped: Vec<(String, usize)>,
}

/// Load `path` into the process environment if it exists.
///
/// Blank lines and `#` comments are ignored. Lines that fail to parse are
/// skipped and reported; the rest still load and override existing
/// variables. Values go through dotenvy's `$VAR` substitution, so a literal
/// `$` must be single-quoted or escaped as `\$`.
///
/// Returns `None` when the file does not exist.
pub fn load_env_file(path: &Path) -> Result<Option<EnvFileReport>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let env_file_error = |source| ConfigError::EnvFile {
        path: path.to_path_buf(),
        source,
    };

    let mut report = EnvFileReport::default();
    for item in dotenvy::from_path_iter(path).map_err(env_file_error)? {
        match item {
            Ok((key, value)) => {
                env::set_var(key, value);
                report.loaded += 1;
            }
            Err(dotenvy::Error::LineParse(line, position)) => {
                report.skipped.push((line, position));
            }
            Err(source) => return Err(env_file_error(source)),
        }
    }
    Ok(Some(report))
}

/// Settings for one backup or restore run.
#[derive(Clone)]
pub struct BackupConfig {
    pub supabase_url: String,
    pub service_key: String,
    pub backup_dir: PathBuf,
    pub request_timeout: Option<Duration>,
}

impl fmt::Debug for BackupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackupConfig")
            .field("supabase_url", &self.supabase_url)
            .field("service_key", &"<redacted>")
            .field("backup_dir", &self.backup_dir)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl BackupConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let (supabase_url, service_key) = match (var(SUPABASE_URL_VAR), var(SERVICE_KEY_VAR)) {
            (Some(url), Some(key)) => (url, key),
            _ => return Err(ConfigError::MissingCredentials),
        };

        let backup_dir = var(BACKUP_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BACKUP_DIR));

        let request_timeout = match var(REQUEST_TIMEOUT_VAR) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: REQUEST_TIMEOUT_VAR,
                        value: raw,
                    })
                }
            },
            None => None,
        };

        Ok(Self {
            supabase_url,
            service_key,
            backup_dir,
            request_timeout,
        })
    }

    pub fn client(&self) -> ApiResult<ApiClient> {
        ApiClient::new(
            self.supabase_url.as_str(),
            self.service_key.as_str(),
            self.request_timeout,
        )
    }
}
