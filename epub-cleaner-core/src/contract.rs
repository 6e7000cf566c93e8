//! # contract: shared types and the storage seam
//!
//! Plain data passed between the HTTP layer and the clean pipeline, the
//! library error type, and the [`ArtifactStore`] trait that every object
//! storage backend implements.
//!
//! ## Mocking & Testing
//! - [`ArtifactStore`] is annotated for `mockall`; with the default
//!   `test-export-mocks` feature `MockArtifactStore` is exported so dependent
//!   crates can drive the pipeline without a network.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;

/// Error type returned by storage backends (simple boxed error, like the backends produce).
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// One file received from the client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename as supplied by the client; unsanitized.
    pub filename: String,
    pub content: Vec<u8>,
}

/// Everything a single POST carries into the pipeline.
#[derive(Debug, Clone, Default)]
pub struct CleanRequest {
    pub files: Vec<UploadedFile>,
    /// Literal strings to remove, in the order they were submitted.
    pub strings: Vec<String>,
    /// Also strip the strings from the sanitized output filename.
    pub process_filename: bool,
}

/// A processed archive that now lives in object storage.
#[derive(Debug, Clone, Serialize)]
pub struct StoredArtifact {
    pub key: String,
    /// Signed GET URL, valid for `expires_in`.
    pub url: String,
    pub expires_in: Duration,
    pub sha256: String,
    pub size: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum CleanError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("archive entry '{0}' escapes the extraction directory")]
    UnsafeEntryPath(String),

    #[error("storage error for key '{key}': {source}")]
    Store { key: String, source: StoreError },

    #[error("background task failed: {0}")]
    Task(String),
}

/// Trait for writing artifacts to object storage and minting signed references.
/// Implemented by real clients (S3) and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Write the file at `local_path` to the object addressed by `key`.
    async fn put_file(&self, local_path: &Path, key: &str) -> Result<(), StoreError>;

    /// Produce a time-limited GET URL for `key`.
    async fn signed_url(&self, key: &str, expires_in: Duration) -> Result<String, StoreError>;
}
