use redb::TableDefinition;

/// Every collection maps a string key to a msgpack-encoded record.
pub type RecordTable = TableDefinition<'static, &'static str, &'static [u8]>;

/// File records: filename -> FileRecord
pub const FILES: RecordTable = TableDefinition::new("files");

/// Short links: shortId -> ShortLinkRecord
pub const SHORT_LINKS: RecordTable = TableDefinition::new("short_links");

/// Invisible URLs: zero-width-space suffixed id -> InvisibleUrlRecord
pub const INVISIBLE_URLS: RecordTable = TableDefinition::new("invisible_urls");
