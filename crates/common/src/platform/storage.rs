//! Blob storage client
//!
//! Uploads and removes document files in the platform's object storage.
//! Removal is a best-effort compensating action on delete paths; the caller
//! decides whether a failure blocks the outer operation.

use tracing::debug;

use crate::config::PlatformConfig;
use crate::errors::{AppError, Result};

/// Client for the platform's object storage API.
#[derive(Clone)]
pub struct BlobClient {
    http: reqwest::Client,
    storage_url: String,
    anon_key: String,
    bucket: String,
}

impl BlobClient {
    pub fn new(http: reqwest::Client, config: &PlatformConfig) -> Self {
        Self {
            http,
            storage_url: config.storage_url(),
            anon_key: config.anon_key.clone(),
            bucket: config.bucket.clone(),
        }
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/object/{}/{}", self.storage_url, self.bucket, path)
    }

    /// Upload a file under `path` in the documents bucket.
    pub async fn upload(
        &self,
        credential: &super::Credential,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        debug!(path, size = bytes.len(), "Uploading blob");

        let response = self
            .http
            .post(self.object_url(path))
            .header("apikey", &self.anon_key)
            .bearer_auth(credential.bearer(&self.anon_key))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(AppError::StoreFailure {
                message: format!("blob upload failed with {status}: {body}"),
            })
        }
    }

    /// Remove the blob at `path`. Callers on delete paths treat a failure
    /// here as non-fatal and log it.
    pub async fn remove(&self, credential: &super::Credential, path: &str) -> Result<()> {
        debug!(path, "Removing blob");

        let response = self
            .http
            .delete(self.object_url(path))
            .header("apikey", &self.anon_key)
            .bearer_auth(credential.bearer(&self.anon_key))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::StoreFailure {
                message: format!("blob removal failed with {}", response.status()),
            })
        }
    }
}
