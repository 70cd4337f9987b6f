use redb::ReadableTable;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::db::{Database, DatabaseError};
use super::models::{FileRecord, InvisibleUrlRecord, ShortLinkRecord};
use super::tables::*;
use super::MetadataStore;

impl Database {
    // ========================================================================
    // Files
    // ========================================================================

    /// Store a file record under its filename
    pub fn put_file(&self, file: &FileRecord) -> Result<(), DatabaseError> {
        debug_assert!(!file.filename.is_empty(), "filename must not be empty");
        self.put_record(FILES, &file.filename, file)
    }

    /// Get a file by its exact filename
    pub fn get_file(&self, filename: &str) -> Result<Option<FileRecord>, DatabaseError> {
        self.get_record(FILES, filename)
    }

    // ========================================================================
    // Short links
    // ========================================================================

    pub fn put_short_link(&self, link: &ShortLinkRecord) -> Result<(), DatabaseError> {
        debug_assert!(!link.short_id.is_empty(), "shortId must not be empty");
        self.put_record(SHORT_LINKS, &link.short_id, link)
    }

    pub fn get_short_link(&self, short_id: &str) -> Result<Option<ShortLinkRecord>, DatabaseError> {
        self.get_record(SHORT_LINKS, short_id)
    }

    // ========================================================================
    // Invisible URLs
    // ========================================================================

    pub fn put_invisible_url(&self, alias: &InvisibleUrlRecord) -> Result<(), DatabaseError> {
        debug_assert!(
            alias.id.ends_with('\u{200B}'),
            "invisible url id must end with a zero-width space"
        );
        self.put_record(INVISIBLE_URLS, &alias.id, alias)
    }

    pub fn get_invisible_url(&self, id: &str) -> Result<Option<InvisibleUrlRecord>, DatabaseError> {
        self.get_record(INVISIBLE_URLS, id)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn put_record<T: Serialize>(
        &self,
        table: RecordTable,
        key: &str,
        record: &T,
    ) -> Result<(), DatabaseError> {
        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(table)?;
            let data = rmp_serde::to_vec_named(record)?;
            table.insert(key, data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn get_record<T: DeserializeOwned>(
        &self,
        table: RecordTable,
        key: &str,
    ) -> Result<Option<T>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(table)?;

        match table.get(key)? {
            Some(data) => {
                let record: T = rmp_serde::from_slice(data.value())?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }
}

impl MetadataStore for Database {
    fn find_file(&self, filename: &str) -> Result<Option<FileRecord>, DatabaseError> {
        self.get_file(filename)
    }

    fn find_short_link(&self, short_id: &str) -> Result<Option<ShortLinkRecord>, DatabaseError> {
        self.get_short_link(short_id)
    }

    fn find_invisible_url(&self, id: &str) -> Result<Option<InvisibleUrlRecord>, DatabaseError> {
        self.get_invisible_url(id)
    }
}
