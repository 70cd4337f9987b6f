//! HTML pages served for files with embeds or show-link enabled.
//!
//! Pages are built with maud, so every interpolated value is HTML-escaped.

mod embed;
mod show_link;

pub use embed::EmbedPage;
pub use show_link::ShowLinkPage;
