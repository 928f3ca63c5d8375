//! ObjectStore trait and storage trigger events.

use crate::error::StorageError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An object-creation notification from the storage service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEvent {
    /// Bucket the object was written to
    #[serde(default)]
    pub bucket: String,

    /// Object name, URL-encoded as delivered by the trigger
    #[serde(default)]
    pub name: String,

    /// Delivery ID used for idempotency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

/// Object storage collaborator: whole-object reads and writes.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Backend name (e.g., "gcs", "local").
    fn name(&self) -> &str;

    /// Download an object's bytes.
    async fn download(&self, bucket: &str, path: &str)
    -> std::result::Result<Vec<u8>, StorageError>;

    /// Create or replace an object.
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> std::result::Result<(), StorageError>;
}
