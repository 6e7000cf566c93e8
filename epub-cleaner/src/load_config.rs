/// `load_config` module: builds the runtime [`CleanerConfig`] from an optional YAML file and the process environment.
///
/// # Precedence
/// Environment variables win over the YAML file, which wins over built-in defaults:
///
/// | Setting            | Environment        | YAML key          | Default   |
/// |--------------------|--------------------|-------------------|-----------|
/// | bucket             | `S3_BUCKET`        | `bucket`          | required  |
/// | max upload (MB)    | `MAX_FILE_SIZE_MB` | `max_upload_mb`   | 200       |
/// | URL lifetime (s)   | `URL_EXPIRY_SECS`  | `url_expiry_secs` | 3600      |
/// | key prefix         | `KEY_PREFIX`       | `key_prefix`      | `uploads` |
///
/// # Errors
/// All errors use `anyhow::Error` and name the offending variable or file, for the CLI boundary.
use anyhow::Result;
use epub_cleaner_core::config::CleanerConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info};

pub const ENV_BUCKET: &str = "S3_BUCKET";
pub const ENV_MAX_UPLOAD_MB: &str = "MAX_FILE_SIZE_MB";
pub const ENV_URL_EXPIRY_SECS: &str = "URL_EXPIRY_SECS";
pub const ENV_KEY_PREFIX: &str = "KEY_PREFIX";

/// Static YAML settings; every field optional so env alone is enough.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub bucket: Option<String>,
    pub max_upload_mb: Option<u64>,
    pub url_expiry_secs: Option<u64>,
    pub key_prefix: Option<String>,
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    info!(config_path = ?path, "Loading configuration from file");

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path, "Failed to read config file");
            return Err(anyhow::anyhow!("Failed to read config file {:?}: {}", path, e));
        }
    };

    match serde_yaml::from_str::<Option<FileConfig>>(&content) {
        Ok(conf) => {
            info!(config_path = ?path, "Parsed config YAML successfully");
            Ok(conf.unwrap_or_default())
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parsed<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_string(name) {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                error!(error = %e, var = name, raw = %raw, "Environment variable is not a valid number");
                Err(anyhow::anyhow!("{name} must be a valid integer, got {raw:?}: {e}"))
            }
        },
        None => Ok(None),
    }
}

/// Merge the optional YAML file at `path` with the environment into a [`CleanerConfig`].
pub fn load_config(path: Option<&Path>) -> Result<CleanerConfig> {
    let file = match path {
        Some(path) => read_file_config(path)?,
        None => FileConfig::default(),
    };

    let bucket = match env_string(ENV_BUCKET).or(file.bucket) {
        Some(bucket) => bucket,
        None => {
            error!("{ENV_BUCKET} environment variable not set and no bucket in config file");
            anyhow::bail!("{ENV_BUCKET} environment variable not set (or `bucket` in the config file)");
        }
    };

    let mut config = CleanerConfig::new(bucket);
    if let Some(mb) = env_parsed::<u64>(ENV_MAX_UPLOAD_MB)?.or(file.max_upload_mb) {
        config.max_upload_mb = mb;
    }
    if let Some(secs) = env_parsed::<u64>(ENV_URL_EXPIRY_SECS)?.or(file.url_expiry_secs) {
        config.url_expiry = Duration::from_secs(secs);
    }
    if let Some(prefix) = env_string(ENV_KEY_PREFIX).or(file.key_prefix) {
        config.key_prefix = prefix;
    }

    if config.max_upload_mb == 0 {
        anyhow::bail!("{ENV_MAX_UPLOAD_MB} must be greater than zero");
    }

    config.trace_loaded();
    Ok(config)
}
