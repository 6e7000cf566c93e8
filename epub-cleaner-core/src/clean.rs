//! Request orchestration: sanitize → extract → clean → repackage → upload for each uploaded file.
//!
//! Every upload runs through the same linear pipeline inside its own temporary
//! workspace. Blocking archive work happens on tokio's blocking pool; the
//! upload goes through the injected [`ArtifactStore`].
//!
//! # Error Handling
//! Fail-fast: the first file that fails aborts the batch and its error is
//! returned. Artifacts uploaded for earlier files stay in storage.
//! Workspaces are removed on every path, since they are dropped `TempDir`s.

use std::path::Path;

use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::CleanerConfig;
use crate::contract::{ArtifactStore, CleanError, CleanRequest, StoredArtifact, UploadedFile};
use crate::extract::extract_archive_file;
use crate::filename::derive_filename;
use crate::gateway;
use crate::repackage::repackage;
use crate::walker::{clean_tree, WalkReport};

/// Result of one processed upload.
#[derive(Debug, Clone, Serialize)]
pub struct CleanedFile {
    /// Output filename, after sanitizing and optional string removal.
    pub filename: String,
    pub artifact: StoredArtifact,
    pub walk: WalkReport,
}

/// Results for a whole request, in upload order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
    pub files: Vec<CleanedFile>,
}

/// Rebuild the archive at `input` into `output` with `strings` removed from its text entries.
///
/// Extraction happens in a private temporary directory that is gone when this returns.
pub fn clean_archive(input: &Path, output: &Path, strings: &[String]) -> Result<WalkReport, CleanError> {
    let workspace = tempfile::Builder::new().prefix("epub-cleaner-").tempdir()?;
    let extract_dir = workspace.path().join("extracted");
    std::fs::create_dir_all(&extract_dir)?;

    extract_archive_file(input, &extract_dir)?;
    let report = clean_tree(&extract_dir, strings)?;
    repackage(&extract_dir, output)?;
    Ok(report)
}

/// Object key for an artifact: `<prefix>/<upload id>/<filename>`.
pub fn artifact_key(prefix: &str, upload_id: &Uuid, filename: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        format!("{upload_id}/{filename}")
    } else {
        format!("{prefix}/{upload_id}/{filename}")
    }
}

/// Run one uploaded file through the full pipeline and upload the result.
pub async fn clean_file<S>(
    config: &CleanerConfig,
    store: &S,
    file: UploadedFile,
    strings: &[String],
    process_filename: bool,
) -> Result<CleanedFile, CleanError>
where
    S: ArtifactStore + ?Sized,
{
    info!(file = %file.filename, size = file.content.len(), "[CLEAN] Processing uploaded file");

    let filename = derive_filename(&file.filename, strings, process_filename);
    if filename != file.filename {
        info!(original = %file.filename, filename = %filename, "[CLEAN] Derived output filename");
    }
    let key = artifact_key(&config.key_prefix, &Uuid::new_v4(), &filename);

    let workspace = tempfile::Builder::new().prefix("epub-cleaner-").tempdir()?;
    let input_path = workspace.path().join("original.epub");
    let output_dir = workspace.path().join("out");
    std::fs::create_dir_all(&output_dir)?;
    let output_path = output_dir.join(&filename);

    let blocking_strings = strings.to_vec();
    let (workspace, walk) = {
        let input_path = input_path.clone();
        let output_path = output_path.clone();
        tokio::task::spawn_blocking(move || -> Result<_, CleanError> {
            std::fs::write(&input_path, &file.content)?;
            let walk = clean_archive(&input_path, &output_path, &blocking_strings)?;
            Ok((workspace, walk))
        })
        .await
        .map_err(|e| CleanError::Task(e.to_string()))??
    };

    let artifact = gateway::store(store, &output_path, &key, config.url_expiry).await?;
    drop(workspace);

    info!(filename = %filename, key = %artifact.key, "[CLEAN] File processed");
    Ok(CleanedFile {
        filename,
        artifact,
        walk,
    })
}

/// Process every file of `request` in order.
///
/// Files with an empty filename are ignored, matching how browsers submit an
/// untouched file input.
pub async fn clean_batch<S>(
    config: &CleanerConfig,
    store: &S,
    request: CleanRequest,
) -> Result<CleanReport, CleanError>
where
    S: ArtifactStore + ?Sized,
{
    let CleanRequest {
        files,
        strings,
        process_filename,
    } = request;
    info!(
        files = files.len(),
        strings = strings.len(),
        process_filename,
        "[CLEAN] Starting batch"
    );

    let mut report = CleanReport::default();
    for file in files.into_iter().filter(|f| !f.filename.is_empty()) {
        let name = file.filename.clone();
        match clean_file(config, store, file, &strings, process_filename).await {
            Ok(cleaned) => report.files.push(cleaned),
            Err(e) => {
                error!(file = %name, error = %e, "[CLEAN][ERROR] Processing failed, aborting batch");
                return Err(e);
            }
        }
    }

    info!(processed = report.files.len(), "[CLEAN] Batch complete");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_key_is_namespaced_by_upload_id() {
        let id = Uuid::nil();
        assert_eq!(
            artifact_key("uploads", &id, "book.epub"),
            "uploads/00000000-0000-0000-0000-000000000000/book.epub"
        );
        assert_eq!(
            artifact_key("/", &id, "book.epub"),
            "00000000-0000-0000-0000-000000000000/book.epub"
        );
    }
}
