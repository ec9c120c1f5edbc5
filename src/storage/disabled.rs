use async_trait::async_trait;
use axum::body::Bytes;

use super::{ImageStorage, StorageError};

/// Backend used when no storage is configured; every upload is refused.
pub struct DisabledImageStorage;

#[async_trait]
impl ImageStorage for DisabledImageStorage {
    fn backend_name(&self) -> &'static str {
        "disabled"
    }

    fn base_url(&self) -> &str {
        ""
    }

    async fn put_object(&self, _key: &str, _bytes: Bytes, _content_type: &str) -> Result<(), StorageError> {
        Err(StorageError::Disabled)
    }

    async fn remove_object(&self, _key: &str) -> Result<bool, StorageError> {
        Ok(false)
    }
}
