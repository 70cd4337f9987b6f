mod local;
mod s3;

pub use local::LocalStore;
pub use s3::{S3Credentials, S3Store};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Object not found: {0}")]
    NotFound(String),
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Bytes of a stored object together with the content type the backend reports for it.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: Option<String>,
}

/// Read access to the blob storage holding uploaded file bytes.
/// Keys are opaque; the metadata store maps filenames to them.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<StoredObject, ObjectStoreError>;
}
