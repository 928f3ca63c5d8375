//! Local filesystem object store.
//!
//! Objects live at `{root}/{bucket}/{path}`. Used by the `summarize` CLI
//! command and for running the summarizer without Cloud Storage.

use arabot_core::error::StorageError;
use arabot_core::storage::ObjectStore;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve an object to a file path, refusing names that escape the root.
    fn resolve(&self, bucket: &str, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(bucket).join(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(StorageError::NotFound {
                bucket: bucket.into(),
                path: path.into(),
            });
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    fn name(&self) -> &str {
        "local"
    }

    async fn download(&self, bucket: &str, path: &str) -> Result<Vec<u8>, StorageError> {
        let file = self.resolve(bucket, path)?;
        match tokio::fs::read(&file).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound {
                bucket: bucket.into(),
                path: path.into(),
            }),
            Err(e) => Err(StorageError::DownloadFailed {
                path: path.into(),
                reason: e.to_string(),
            }),
        }
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        let file = self.resolve(bucket, path)?;
        let upload_err = |e: std::io::Error| StorageError::UploadFailed {
            path: path.into(),
            reason: e.to_string(),
        };
        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(upload_err)?;
        }
        tokio::fs::write(&file, data).await.map_err(upload_err)?;
        debug!(file = %file.display(), "Wrote object to disk");
        Ok(())
    }
}
