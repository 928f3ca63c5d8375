//! Object store implementations for Arabot.

pub mod gcs;
pub mod in_memory;
pub mod local;

pub use gcs::GcsStore;
pub use in_memory::InMemoryStore;
pub use local::LocalStore;

use arabot_config::{StorageBackend, StorageConfig};
use arabot_core::credentials::AccessTokenSource;
use arabot_core::error::StorageError;
use arabot_core::storage::ObjectStore;
use std::sync::Arc;

/// Build the configured object store.
pub fn build_from_config(
    config: &StorageConfig,
    tokens: Arc<dyn AccessTokenSource>,
) -> Result<Arc<dyn ObjectStore>, StorageError> {
    match config.backend {
        StorageBackend::Gcs => Ok(Arc::new(GcsStore::new(&config.api_base, tokens)?)),
        StorageBackend::Local => Ok(Arc::new(LocalStore::new(&config.local_root))),
    }
}
