use std::time::Duration;
use tracing::{debug, info};

/// Upload limit applied when nothing else is configured, in megabytes.
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 200;

/// Lifetime of a signed download URL unless configured otherwise.
pub const DEFAULT_URL_EXPIRY: Duration = Duration::from_secs(3600);

pub const DEFAULT_KEY_PREFIX: &str = "uploads";

/// Runtime settings threaded into the clean pipeline and the HTTP layer.
#[derive(Debug, Clone)]
pub struct CleanerConfig {
    /// Object-storage bucket receiving the processed artifacts.
    pub bucket: String,
    /// Requests with a larger body are rejected with 413.
    pub max_upload_mb: u64,
    /// How long a signed download URL stays valid.
    pub url_expiry: Duration,
    /// Leading key segment; artifacts land at `<key_prefix>/<uuid>/<filename>`.
    pub key_prefix: String,
}

impl CleanerConfig {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
            url_expiry: DEFAULT_URL_EXPIRY,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        (self.max_upload_mb as usize).saturating_mul(1024 * 1024)
    }

    pub fn trace_loaded(&self) {
        info!(
            bucket = %self.bucket,
            max_upload_mb = self.max_upload_mb,
            url_expiry_secs = self.url_expiry.as_secs(),
            key_prefix = %self.key_prefix,
            "Loaded CleanerConfig"
        );
        debug!(?self, "CleanerConfig loaded (full debug)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_defaults() {
        let config = CleanerConfig::new("books");
        assert_eq!(config.bucket, "books");
        assert_eq!(config.max_upload_mb, 200);
        assert_eq!(config.url_expiry, Duration::from_secs(3600));
        assert_eq!(config.key_prefix, "uploads");
    }

    #[test]
    fn max_upload_bytes_converts_megabytes() {
        let mut config = CleanerConfig::new("books");
        config.max_upload_mb = 10;
        assert_eq!(config.max_upload_bytes(), 10 * 1024 * 1024);
    }
}
