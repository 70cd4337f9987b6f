pub mod db;
pub mod models;
mod records;
mod tables;

pub use db::{Database, DatabaseError, ImportStats};
pub use tables::*;

use models::{FileRecord, InvisibleUrlRecord, ShortLinkRecord};

/// Read-only lookups against the three record collections.
///
/// Every lookup is an exact, case-sensitive key match. `Ok(None)` means the key
/// is absent; a record that exists but cannot be decoded is an error.
pub trait MetadataStore: Send + Sync {
    fn find_file(&self, filename: &str) -> Result<Option<FileRecord>, DatabaseError>;
    fn find_short_link(&self, short_id: &str) -> Result<Option<ShortLinkRecord>, DatabaseError>;
    fn find_invisible_url(&self, id: &str) -> Result<Option<InvisibleUrlRecord>, DatabaseError>;
}
