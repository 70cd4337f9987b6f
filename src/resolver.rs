//! Record lookups, alias indirection and domain policy for each strategy.

use thiserror::Error;

use crate::object_store::ObjectStoreError;
use crate::storage::models::FileRecord;
use crate::storage::{DatabaseError, MetadataStore};
use crate::strategy::is_invisible_key;

pub const INVALID_FILE: &str = "invalid file";
pub const INVALID_SHORT_LINK: &str = "invalid short link";
pub const INVALID_INVISIBLE_URL: &str = "no invisible url or file was found";

const DOMAIN_TOKEN: &str = "{domain}";

/// Every way resolving or composing a response can fail. All variants end the
/// request with the JSON error envelope.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Record missing, or hidden by domain policy.
    #[error("{0}")]
    NotFound(&'static str),
    /// A stored record exists but does not decode. Reported like `NotFound`.
    #[error("{message}")]
    Decode {
        message: &'static str,
        #[source]
        source: rmp_serde::decode::Error,
    },
    #[error("{0}")]
    Storage(#[source] DatabaseError),
    #[error("{0}")]
    Upstream(#[from] ObjectStoreError),
    #[error("{0}")]
    Render(String),
}

/// Resolves routing keys against the metadata store on behalf of one request.
pub struct Resolver<'a> {
    store: &'a dyn MetadataStore,
    host: &'a str,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a dyn MetadataStore, host: &'a str) -> Self {
        Self { store, host }
    }

    /// Title and author for the oEmbed document of `filename`, with `{domain}` substituted.
    pub fn oembed(&self, filename: &str) -> Result<(String, String), ResolveError> {
        let file = found(self.store.find_file(filename), INVALID_FILE)?;
        Ok((
            substitute_domain(&file.embed.title, self.host),
            substitute_domain(&file.embed.author, self.host),
        ))
    }

    /// Redirect target for `short_id`.
    pub fn short_link(&self, short_id: &str) -> Result<String, ResolveError> {
        let link = found(self.store.find_short_link(short_id), INVALID_SHORT_LINK)?;
        Ok(normalize_destination(&link.destination))
    }

    /// The file behind `key`, following an invisible URL alias when the key ends in a
    /// zero-width space, and enforcing the file's domain restriction.
    pub fn file(&self, key: &str) -> Result<FileRecord, ResolveError> {
        let file = if is_invisible_key(key) {
            let alias = found(self.store.find_invisible_url(key), INVALID_INVISIBLE_URL)?;
            found(self.store.find_file(&alias.filename), INVALID_FILE)?
        } else {
            found(self.store.find_file(key), INVALID_FILE)?
        };

        if file.user_only_domain && self.host != file.domain {
            tracing::warn!(
                filename = %file.filename,
                host = %self.host,
                "Rejected request for domain-restricted file"
            );
            return Err(ResolveError::NotFound(INVALID_FILE));
        }

        Ok(file)
    }
}

/// Replace every `{domain}` token in `text` with `host`.
pub fn substitute_domain(text: &str, host: &str) -> String {
    text.replace(DOMAIN_TOKEN, host)
}

/// Prefix `https://` unless the destination already starts with `http`.
pub fn normalize_destination(destination: &str) -> String {
    if destination.starts_with("http") {
        destination.to_string()
    } else {
        format!("https://{destination}")
    }
}

fn found<T>(
    lookup: Result<Option<T>, DatabaseError>,
    missing: &'static str,
) -> Result<T, ResolveError> {
    match lookup {
        Ok(Some(record)) => Ok(record),
        Ok(None) => {
            tracing::debug!(error = missing, "Lookup missed");
            Err(ResolveError::NotFound(missing))
        }
        Err(DatabaseError::Deserialization(source)) => {
            tracing::warn!(error = %source, "Stored record failed to decode");
            Err(ResolveError::Decode {
                message: missing,
                source,
            })
        }
        Err(e) => {
            tracing::error!(error = %e, "Metadata lookup failed");
            Err(ResolveError::Storage(e))
        }
    }
}
