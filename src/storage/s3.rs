use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use axum::body::Bytes;

use super::{ImageStorage, StorageError};
use crate::config::S3StorageConfig;

/// S3-compatible object storage with public-read objects.
pub struct S3ImageStorage {
    client: Client,
    bucket: String,
    base_url: String,
    max_file_size: u64,
}

impl S3ImageStorage {
    pub async fn new(config: &S3StorageConfig, max_file_size: u64) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "careers-rs",
            ))
            .endpoint_url(&config.endpoint)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
            base_url: config.public_base_url(),
            max_file_size,
        }
    }
}

#[async_trait]
impl ImageStorage for S3ImageStorage {
    fn backend_name(&self) -> &'static str {
        "s3"
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    async fn put_object(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| StorageError::Backend {
                operation: "put_object",
                source: anyhow::Error::from(e),
            })?;
        Ok(())
    }

    async fn remove_object(&self, key: &str) -> Result<bool, StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Backend {
                operation: "delete_object",
                source: anyhow::Error::from(e),
            })?;
        Ok(true)
    }
}
