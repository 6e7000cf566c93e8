#![doc = "Object-storage integration: bridges the core `ArtifactStore` trait to S3 via `object_store`."]
//
//! # S3 artifact store
//!
//! [`S3Store`] implements [`ArtifactStore`] against an S3 (or S3-compatible)
//! bucket. Credentials, region and endpoint come from the standard `AWS_*`
//! environment variables read by [`AmazonS3Builder::from_env`]; only the bucket
//! name is passed in from [`CleanerConfig`](epub_cleaner_core::config::CleanerConfig).
//!
//! Signed URLs are SigV4 presigned GET requests and need no network round trip.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use epub_cleaner_core::contract::{ArtifactStore, StoreError};
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as ObjectPath;
use object_store::signer::Signer;
use object_store::{ObjectStore, PutPayload};

pub struct S3Store {
    client: AmazonS3,
    bucket: String,
}

impl S3Store {
    pub fn new_from_env(bucket: &str) -> Result<Self, StoreError> {
        let client = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| {
                tracing::error!(error = ?e, bucket, "Failed to build S3 client from environment");
                e
            })?;
        tracing::info!(bucket, "Initialized S3Store from environment");
        Ok(S3Store {
            client,
            bucket: bucket.to_string(),
        })
    }
}

#[async_trait]
impl ArtifactStore for S3Store {
    async fn put_file(&self, local_path: &Path, key: &str) -> Result<(), StoreError> {
        let bytes = tokio::fs::read(local_path).await?;
        let size = bytes.len();
        let result = self
            .client
            .put(&ObjectPath::from(key), PutPayload::from(bytes))
            .await;

        match result {
            Ok(put) => {
                tracing::info!(
                    bucket = %self.bucket,
                    key,
                    size,
                    e_tag = ?put.e_tag,
                    "Stored object"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(bucket = %self.bucket, key, error = ?e, "S3 put failed");
                Err(Box::new(e))
            }
        }
    }

    async fn signed_url(&self, key: &str, expires_in: Duration) -> Result<String, StoreError> {
        let url = self
            .client
            .signed_url(reqwest::Method::GET, &ObjectPath::from(key), expires_in)
            .await?;
        tracing::debug!(bucket = %self.bucket, key, "Signed download URL");
        Ok(url.to_string())
    }
}
