use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use axum::body::Bytes;
use tokio::fs;

use super::{ImageStorage, StorageError};
use crate::config::LocalStorageConfig;

/// Stores images on the local filesystem; the server exposes `root_dir`
/// under `public_url`.
pub struct LocalImageStorage {
    root_dir: PathBuf,
    base_url: String,
    max_file_size: u64,
}

impl LocalImageStorage {
    pub async fn new(config: &LocalStorageConfig, max_file_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.root_dir).await?;
        Ok(Self {
            root_dir: PathBuf::from(&config.root_dir),
            base_url: config.public_url.trim_end_matches('/').to_string(),
            max_file_size,
        })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Resolves `key` inside the root directory, refusing anything that
    /// could escape it.
    fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key);
        let safe = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if !safe || key.is_empty() {
            return Err(StorageError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.root_dir.join(relative))
    }
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    fn backend_name(&self) -> &'static str {
        "local"
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
        _content_type: &str,
    ) -> Result<(), StorageError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, &bytes).await?;
        Ok(())
    }

    async fn remove_object(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ImageFile;
    use tempfile::TempDir;

    async fn storage(dir: &TempDir) -> LocalImageStorage {
        let config = LocalStorageConfig {
            root_dir: dir.path().join("uploads").to_string_lossy().into_owned(),
            public_url: "http://localhost:3000/uploads/".to_string(),
        };
        LocalImageStorage::new(&config, 1024).await.unwrap()
    }

    #[tokio::test]
    async fn test_upload_writes_file_and_returns_url() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;

        let url = storage
            .upload(ImageFile::new("logo.PNG", vec![7u8; 10]), "logos")
            .await
            .unwrap();

        assert!(url.starts_with("http://localhost:3000/uploads/logos/"));
        assert!(url.ends_with(".png"));

        let key = url.trim_start_matches("http://localhost:3000/uploads/");
        let written = std::fs::read(storage.root_dir().join(key)).unwrap();
        assert_eq!(written, vec![7u8; 10]);
    }

    #[tokio::test]
    async fn test_upload_rejects_invalid_file_before_writing() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;

        let result = storage
            .upload(ImageFile::new("big.png", vec![0u8; 2048]), "logos")
            .await;
        assert!(matches!(result, Err(StorageError::FileTooLarge { .. })));
        assert!(!storage.root_dir().join("logos").exists());
    }

    #[tokio::test]
    async fn test_delete_removes_uploaded_file() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;

        let url = storage
            .upload(ImageFile::new("photo.jpg", vec![1u8; 4]), "photos")
            .await
            .unwrap();

        assert!(storage.delete(&url).await);
        assert!(!storage.delete(&url).await);
    }

    #[tokio::test]
    async fn test_delete_ignores_foreign_and_escaping_urls() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;

        assert!(!storage.delete("https://other.example.com/photos/a.png").await);
        assert!(!storage.delete("http://localhost:3000/uploads/../secret.png").await);
    }
}
