//! Google Cloud Storage backend over the JSON API.
//!
//! - download: `GET {base}/storage/v1/b/{bucket}/o/{object}?alt=media`
//! - upload: `POST {base}/upload/storage/v1/b/{bucket}/o?uploadType=media&name={object}`
//!
//! Object names go into the URL path percent-encoded (slashes included).

use arabot_core::credentials::AccessTokenSource;
use arabot_core::error::StorageError;
use arabot_core::storage::ObjectStore;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub struct GcsStore {
    api_base: String,
    tokens: Arc<dyn AccessTokenSource>,
    client: reqwest::Client,
}

impl GcsStore {
    pub fn new(api_base: &str, tokens: Arc<dyn AccessTokenSource>) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| StorageError::NotConfigured(format!("HTTP client: {e}")))?;
        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            tokens,
            client,
        })
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/b/{}/o/{}",
            self.api_base,
            urlencoding::encode(bucket),
            urlencoding::encode(path)
        )
    }

    fn upload_url(&self, bucket: &str) -> String {
        format!(
            "{}/upload/storage/v1/b/{}/o",
            self.api_base,
            urlencoding::encode(bucket)
        )
    }

    async fn bearer(&self) -> Result<String, StorageError> {
        self.tokens
            .access_token()
            .await
            .map(|t| t.token)
            .map_err(|e| StorageError::NotConfigured(e.to_string()))
    }
}

#[async_trait]
impl ObjectStore for GcsStore {
    fn name(&self) -> &str {
        "gcs"
    }

    async fn download(&self, bucket: &str, path: &str) -> Result<Vec<u8>, StorageError> {
        let token = self.bearer().await?;
        let response = self
            .client
            .get(self.object_url(bucket, path))
            .query(&[("alt", "media")])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| StorageError::DownloadFailed {
                path: path.into(),
                reason: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(StorageError::NotFound {
                bucket: bucket.into(),
                path: path.into(),
            });
        }
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::DownloadFailed {
                path: path.into(),
                reason: format!("HTTP {status}: {body}"),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed {
                path: path.into(),
                reason: e.to_string(),
            })?;
        debug!(bucket = %bucket, path = %path, bytes = bytes.len(), "Downloaded object");
        Ok(bytes.to_vec())
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let token = self.bearer().await?;
        let size = data.len();
        let response = self
            .client
            .post(self.upload_url(bucket))
            .query(&[("uploadType", "media"), ("name", path)])
            .bearer_auth(token)
            .header("Content-Type", content_type)
            .body(data)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed {
                path: path.into(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::UploadFailed {
                path: path.into(),
                reason: format!("HTTP {}: {body}", status.as_u16()),
            });
        }

        info!(bucket = %bucket, path = %path, bytes = size, "Uploaded object");
        Ok(())
    }
}
