use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};

use super::{ObjectStore, ObjectStoreError, StoredObject};

/// Local filesystem object store for development and testing.
///
/// The content type is guessed from the key's extension.
pub struct LocalStore {
    base_path: PathBuf,
}

impl LocalStore {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, std::io::Error> {
        let base_path = base_path.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    fn object_path(&self, key: &str) -> Option<PathBuf> {
        let relative = Path::new(key);
        // Keys never climb out of the store root
        if relative
            .components()
            .any(|c| !matches!(c, std::path::Component::Normal(_)))
        {
            return None;
        }
        Some(self.base_path.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn get(&self, key: &str) -> Result<StoredObject, ObjectStoreError> {
        let path = self
            .object_path(key)
            .ok_or_else(|| ObjectStoreError::NotFound(key.to_string()))?;

        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ObjectStoreError::NotFound(key.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(StoredObject {
            data: Bytes::from(data),
            content_type: mime_guess::from_path(key).first().map(|m| m.to_string()),
        })
    }
}
