//! higure-cdn - read path of a file host
//!
//! Every request path resolves to exactly one way of answering it:
//! - `/` redirects to the marketing site
//! - `/<file>.json` returns oEmbed metadata
//! - `/s/<id>` follows a short link
//! - `/<file>` and `/<alias>\u{200B}` serve a file as an embed page, a show-link
//!   page or its raw bytes
//!
//! Metadata lives in a redb database, file bytes in a local or S3-compatible
//! object store.

pub mod api;
pub mod compose;
pub mod config;
pub mod object_store;
pub mod render;
pub mod resolver;
pub mod storage;
pub mod strategy;
#[cfg(test)]
pub mod testutil;

use std::sync::Arc;

use config::Config;
use storage::MetadataStore;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub metadata: Arc<dyn MetadataStore>,
    pub object_store: Arc<dyn object_store::ObjectStore>,
}
