use std::path::Path;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tracing::{error, info};

use crate::contract::{ArtifactStore, CleanError, StoredArtifact};

/// Upload `local_path` under `key` and return a signed reference valid for `expires_in`.
///
/// No retries: a failed write or signing call is returned to the caller as-is.
pub async fn store<S>(
    store: &S,
    local_path: &Path,
    key: &str,
    expires_in: Duration,
) -> Result<StoredArtifact, CleanError>
where
    S: ArtifactStore + ?Sized,
{
    let bytes = tokio::fs::read(local_path).await?;
    let sha256 = format!("{:x}", Sha256::digest(&bytes));
    let size = bytes.len() as u64;
    drop(bytes);

    info!(key, size, "[UPLOAD] Uploading artifact");
    store.put_file(local_path, key).await.map_err(|e| {
        error!(key, error = ?e, "[UPLOAD][ERROR] put_file failed");
        CleanError::Store {
            key: key.to_string(),
            source: e,
        }
    })?;

    let url = store.signed_url(key, expires_in).await.map_err(|e| {
        error!(key, error = ?e, "[UPLOAD][ERROR] signed_url failed");
        CleanError::Store {
            key: key.to_string(),
            source: e,
        }
    })?;
    info!(key, expires_in_secs = expires_in.as_secs(), "[UPLOAD] Upload complete");

    Ok(StoredArtifact {
        key: key.to_string(),
        url,
        expires_in,
        sha256,
        size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::MockArtifactStore;

    #[tokio::test]
    async fn store_uploads_then_signs() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("book.epub");
        std::fs::write(&file, b"abc").unwrap();

        let mut mock = MockArtifactStore::new();
        mock.expect_put_file()
            .withf(|_, key| key == "uploads/1/book.epub")
            .times(1)
            .returning(|_, _| Ok(()));
        mock.expect_signed_url()
            .times(1)
            .returning(|key, ttl| Ok(format!("https://signed/{key}?ttl={}", ttl.as_secs())));

        let artifact = store(&mock, &file, "uploads/1/book.epub", Duration::from_secs(3600))
            .await
            .unwrap();

        assert_eq!(artifact.url, "https://signed/uploads/1/book.epub?ttl=3600");
        assert_eq!(artifact.size, 3);
        assert_eq!(
            artifact.sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn store_failure_is_propagated_without_signing() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("book.epub");
        std::fs::write(&file, b"abc").unwrap();

        let mut mock = MockArtifactStore::new();
        mock.expect_put_file()
            .times(1)
            .returning(|_, _| Err("bucket unavailable".into()));
        mock.expect_signed_url().times(0);

        let err = store(&mock, &file, "k", Duration::from_secs(60))
            .await
            .unwrap_err();

        assert!(matches!(err, CleanError::Store { ref key, .. } if key == "k"));
        assert!(err.to_string().contains("bucket unavailable"));
    }
}
