//! In-memory object store — useful for testing and dry runs.

use arabot_core::error::StorageError;
use arabot_core::storage::ObjectStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Objects keyed by `(bucket, path)`.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    objects: Arc<RwLock<BTreeMap<(String, String), StoredObject>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object directly.
    pub async fn insert(&self, bucket: &str, path: &str, data: impl Into<Vec<u8>>) {
        self.objects.write().await.insert(
            (bucket.into(), path.into()),
            StoredObject {
                data: data.into(),
                content_type: "application/octet-stream".into(),
            },
        );
    }

    pub async fn get(&self, bucket: &str, path: &str) -> Option<StoredObject> {
        self.objects
            .read()
            .await
            .get(&(bucket.to_string(), path.to_string()))
            .cloned()
    }

    /// Object paths in a bucket, sorted.
    pub async fn paths(&self, bucket: &str) -> Vec<String> {
        self.objects
            .read()
            .await
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn download(&self, bucket: &str, path: &str) -> Result<Vec<u8>, StorageError> {
        self.get(bucket, path)
            .await
            .map(|o| o.data)
            .ok_or_else(|| StorageError::NotFound {
                bucket: bucket.into(),
                path: path.into(),
            })
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.objects.write().await.insert(
            (bucket.into(), path.into()),
            StoredObject {
                data,
                content_type: content_type.into(),
            },
        );
        Ok(())
    }
}
