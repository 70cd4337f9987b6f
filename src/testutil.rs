//! Shared test helpers.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Config, ServerConfig, SiteConfig, StorageConfig};
use crate::object_store::{LocalStore, ObjectStore, ObjectStoreError, StoredObject};
use crate::storage::models::{Embed, FileRecord, Uploader};
use crate::storage::Database;
use crate::AppState;

/// Create a test AppState with a temporary database and local object store.
/// The returned database handle shares storage with the state, for seeding.
///
/// File URLs are built against `https://s3.example.com/uploads`.
pub fn test_state(temp_dir: &tempfile::TempDir) -> (Arc<AppState>, Database) {
    let data_dir = temp_dir.path().join("data");
    let files_dir = temp_dir.path().join("files");

    let config = Config {
        server: ServerConfig {
            bind_address: "127.0.0.1:0".to_string(),
            data_dir: data_dir.to_string_lossy().to_string(),
        },
        site: SiteConfig::default(),
        storage: StorageConfig {
            local_storage_path: files_dir.to_string_lossy().to_string(),
            endpoint: "https://s3.example.com".to_string(),
            bucket: "uploads".to_string(),
            ..Default::default()
        },
        seed_file: None,
    };

    let db = Database::open(&data_dir).expect("Failed to open test database");
    let object_store = LocalStore::new(&files_dir).expect("Failed to create test object store");

    let state = Arc::new(AppState {
        config,
        metadata: Arc::new(db.clone()),
        object_store: Arc::new(object_store),
    });
    (state, db)
}

/// Write object bytes where the test state's local store will find them.
pub fn write_object(temp_dir: &tempfile::TempDir, key: &str, data: &[u8]) {
    let path = temp_dir.path().join("files").join(key);
    std::fs::write(path, data).expect("Failed to write test object");
}

/// A file with embeds and show-link off, stored under key `k-<filename>`.
pub fn sample_file(filename: &str, mimetype: &str) -> FileRecord {
    FileRecord {
        filename: filename.to_string(),
        key: format!("k-{filename}"),
        mimetype: mimetype.to_string(),
        size: "1.2 MB".to_string(),
        domain: "i.example.com".to_string(),
        user_only_domain: false,
        show_link: false,
        uploader: Uploader {
            username: "alice".to_string(),
        },
        embed: Embed {
            enabled: false,
            title: "{domain}".to_string(),
            author: "alice".to_string(),
            description: "uploaded to {domain}".to_string(),
            color: "#ff00aa".to_string(),
        },
    }
}

/// Object store whose every fetch fails.
pub struct FailingStore;

#[async_trait]
impl ObjectStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<StoredObject, ObjectStoreError> {
        Err(ObjectStoreError::Backend("connection refused".to_string()))
    }
}
