//! Image storage backends.
//!
//! Uploaded images are validated, given a unique object key under a folder
//! and written to the configured backend. The returned public URL is what
//! gets stored on the owning row (user photo, company logo, job post
//! thumbnail).

mod disabled;
mod local;
mod s3;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{StorageBackend, StorageConfig};

pub use disabled::DisabledImageStorage;
pub use local::LocalImageStorage;
pub use s3::S3ImageStorage;

/// Default upload limit, 5 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Accepted image extensions, lowercase with the leading dot.
pub const ALLOWED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp"];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Image file is empty")]
    EmptyFile,

    #[error("Image is {size} bytes, the limit is {limit} bytes")]
    FileTooLarge { size: u64, limit: u64 },

    #[error(
        "Unsupported image extension '{extension}', allowed formats: JPG, JPEG, PNG, GIF, WEBP"
    )]
    UnsupportedExtension { extension: String },

    #[error("Image storage is disabled")]
    Disabled,

    #[error("Invalid object key: {key}")]
    InvalidKey { key: String },

    #[error("Storage I/O failed")]
    Io(#[from] std::io::Error),

    #[error("Storage backend request failed: {operation}")]
    Backend {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

/// An uploaded image held in memory.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: Bytes,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Lowercased extension with its leading dot, empty when the name has none.
    pub fn extension(&self) -> String {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
            .unwrap_or_default()
    }
}

/// Object storage for uploaded images.
///
/// Backends implement the raw object operations; validation, key generation
/// and URL handling are shared by the provided `upload` and `delete`.
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;

    /// Public base URL that object keys are appended to.
    fn base_url(&self) -> &str;

    fn max_file_size(&self) -> u64 {
        DEFAULT_MAX_FILE_SIZE
    }

    /// Stores `bytes` under `key`.
    async fn put_object(&self, key: &str, bytes: Bytes, content_type: &str)
    -> Result<(), StorageError>;

    /// Removes `key`, returning whether an object was actually deleted.
    async fn remove_object(&self, key: &str) -> Result<bool, StorageError>;

    /// Validates `file`, stores it under `folder` and returns its public URL.
    async fn upload(&self, file: ImageFile, folder: &str) -> Result<String, StorageError> {
        validate_image(&file, self.max_file_size())?;

        let extension = file.extension();
        let key = object_key(folder, &extension);
        self.put_object(&key, file.bytes, content_type_for(&extension))
            .await?;

        tracing::info!(backend = self.backend_name(), key = %key, "Image uploaded");
        Ok(public_url(self.base_url(), &key))
    }

    /// Deletes the object behind `url`.
    ///
    /// URLs that do not belong to this storage are ignored. Failures are
    /// logged and reported as `false`.
    async fn delete(&self, url: &str) -> bool {
        let Some(key) = key_from_url(self.base_url(), url) else {
            tracing::debug!(url, "Skipping delete of foreign image URL");
            return false;
        };

        match self.remove_object(key).await {
            Ok(deleted) => deleted,
            Err(e) => {
                tracing::warn!(backend = self.backend_name(), key, error = %e, "Failed to delete image");
                false
            }
        }
    }
}

/// Rejects empty, oversized and non-image files.
pub fn validate_image(file: &ImageFile, max_file_size: u64) -> Result<(), StorageError> {
    if file.bytes.is_empty() {
        return Err(StorageError::EmptyFile);
    }
    if file.size() > max_file_size {
        return Err(StorageError::FileTooLarge {
            size: file.size(),
            limit: max_file_size,
        });
    }

    let extension = file.extension();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(StorageError::UnsupportedExtension { extension });
    }
    Ok(())
}

/// `{folder}/{unix_seconds}_{8 hex chars}{ext}`
pub fn object_key(folder: &str, extension: &str) -> String {
    let timestamp = jiff::Timestamp::now().as_second();
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}/{}_{}{}",
        folder.trim_matches('/'),
        timestamp,
        &suffix[..8],
        extension
    )
}

pub fn content_type_for(extension: &str) -> &'static str {
    match extension {
        ".jpg" | ".jpeg" => "image/jpeg",
        ".png" => "image/png",
        ".gif" => "image/gif",
        ".webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

pub fn public_url(base_url: &str, key: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), key)
}

/// Object key of `url` when it lives under `base_url`.
pub fn key_from_url<'a>(base_url: &str, url: &'a str) -> Option<&'a str> {
    let base = base_url.trim_end_matches('/');
    if base.is_empty() {
        return None;
    }
    url.strip_prefix(base)?
        .strip_prefix('/')
        .filter(|key| !key.is_empty())
}

/// Builds the backend selected by `config.backend`.
pub async fn build_storage(config: &StorageConfig) -> Result<Arc<dyn ImageStorage>, StorageError> {
    let storage: Arc<dyn ImageStorage> = match config.backend {
        StorageBackend::S3 => Arc::new(S3ImageStorage::new(&config.s3, config.max_file_size).await),
        StorageBackend::Local => {
            Arc::new(LocalImageStorage::new(&config.local, config.max_file_size).await?)
        }
        StorageBackend::Disabled => Arc::new(DisabledImageStorage),
    };

    tracing::info!(backend = storage.backend_name(), base_url = storage.base_url(), "Image storage ready");
    Ok(storage)
}
