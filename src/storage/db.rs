use redb::{Database as RedbDatabase, ReadTransaction, WriteTransaction};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use super::models::SeedData;
use super::tables::*;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Commit error: {0}")]
    Commit(Box<redb::CommitError>),
    #[error("Database error: {0}")]
    RedbDatabase(Box<redb::DatabaseError>),
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Seed parse error: {0}")]
    Seed(#[from] serde_json::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),
    #[error("Storage error: {0}")]
    Storage(Box<redb::StorageError>),
    #[error("Table error: {0}")]
    Table(Box<redb::TableError>),
    #[error("Transaction error: {0}")]
    Transaction(Box<redb::TransactionError>),
}

impl From<redb::CommitError> for DatabaseError {
    fn from(e: redb::CommitError) -> Self {
        DatabaseError::Commit(Box::new(e))
    }
}

impl From<redb::DatabaseError> for DatabaseError {
    fn from(e: redb::DatabaseError) -> Self {
        DatabaseError::RedbDatabase(Box::new(e))
    }
}

impl From<redb::StorageError> for DatabaseError {
    fn from(e: redb::StorageError) -> Self {
        DatabaseError::Storage(Box::new(e))
    }
}

impl From<redb::TableError> for DatabaseError {
    fn from(e: redb::TableError) -> Self {
        DatabaseError::Table(Box::new(e))
    }
}

impl From<redb::TransactionError> for DatabaseError {
    fn from(e: redb::TransactionError) -> Self {
        DatabaseError::Transaction(Box::new(e))
    }
}

pub struct Database {
    db: Arc<RedbDatabase>,
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
        }
    }
}

/// Statistics from a seed import
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub files: u64,
    pub short_links: u64,
    pub invisible_urls: u64,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(data_dir.as_ref())?;
        let db_path = data_dir.as_ref().join("higure-cdn.redb");
        let db = Arc::new(RedbDatabase::create(db_path)?);

        // Initialize application tables
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(FILES)?;
            let _ = write_txn.open_table(SHORT_LINKS)?;
            let _ = write_txn.open_table(INVISIBLE_URLS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Begin a read transaction
    pub fn begin_read(&self) -> Result<ReadTransaction, DatabaseError> {
        Ok(self.db.begin_read()?)
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> Result<WriteTransaction, DatabaseError> {
        Ok(self.db.begin_write()?)
    }

    // ========================================================================
    // Bulk import
    // ========================================================================

    /// Write every record in `seed` in a single transaction, overwriting existing keys.
    pub fn import(&self, seed: &SeedData) -> Result<ImportStats, DatabaseError> {
        let write_txn = self.begin_write()?;
        let mut stats = ImportStats::default();

        {
            let mut table = write_txn.open_table(FILES)?;
            for file in &seed.files {
                let data = rmp_serde::to_vec_named(file)?;
                table.insert(file.filename.as_str(), data.as_slice())?;
                stats.files += 1;
            }
        }

        {
            let mut table = write_txn.open_table(SHORT_LINKS)?;
            for link in &seed.shorteners {
                let data = rmp_serde::to_vec_named(link)?;
                table.insert(link.short_id.as_str(), data.as_slice())?;
                stats.short_links += 1;
            }
        }

        {
            let mut table = write_txn.open_table(INVISIBLE_URLS)?;
            for alias in &seed.invisible_urls {
                let data = rmp_serde::to_vec_named(alias)?;
                table.insert(alias.id.as_str(), data.as_slice())?;
                stats.invisible_urls += 1;
            }
        }

        write_txn.commit()?;
        Ok(stats)
    }

    /// Read and import a JSON seed document from disk.
    pub fn import_file<P: AsRef<Path>>(&self, path: P) -> Result<ImportStats, DatabaseError> {
        let raw = std::fs::read(path)?;
        let seed: SeedData = serde_json::from_slice(&raw)?;
        self.import(&seed)
    }
}
