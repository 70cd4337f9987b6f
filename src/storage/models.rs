use serde::{Deserialize, Serialize};

/// Broad media class of a file, taken from the part of its MIME type before the first `/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

impl MediaKind {
    /// Derive the media class from a MIME type string.
    pub fn from_mime(mime_type: &str) -> Self {
        match mime_category(mime_type) {
            "image" => MediaKind::Image,
            "video" => MediaKind::Video,
            _ => MediaKind::Other,
        }
    }

    pub fn is_image(self) -> bool {
        self == MediaKind::Image
    }

    pub fn is_video(self) -> bool {
        self == MediaKind::Video
    }
}

/// The substring of a MIME type before the first `/`, or the whole string if there is none.
pub fn mime_category(mime_type: &str) -> &str {
    mime_type.split('/').next().unwrap_or("")
}

/// Preview settings attached to every uploaded file.
///
/// `title`, `author` and `description` may contain a `{domain}` token that is
/// replaced with the request host at render time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Uploader {
    pub username: String,
}

/// An uploaded file, keyed by its globally unique `filename`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub filename: String,
    /// Object store key holding the file bytes.
    pub key: String,
    pub mimetype: String,
    /// Human-readable size, e.g. "1.2 MB".
    pub size: String,
    /// Domain the file was uploaded under.
    pub domain: String,
    /// Only serve the file when requested through `domain`.
    #[serde(default)]
    pub user_only_domain: bool,
    /// Serve a bare image page instead of the raw bytes.
    #[serde(default)]
    pub show_link: bool,
    pub uploader: Uploader,
    pub embed: Embed,
}

impl FileRecord {
    pub fn media_kind(&self) -> MediaKind {
        MediaKind::from_mime(&self.mimetype)
    }
}

/// A short link, keyed by `shortId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkRecord {
    pub short_id: String,
    /// Target URL; the scheme may be missing.
    pub destination: String,
}

/// An alias whose key ends in a zero-width space and points at a real filename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvisibleUrlRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub filename: String,
}

/// Bulk import document, shaped like an export of the three record collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub files: Vec<FileRecord>,
    #[serde(default)]
    pub shorteners: Vec<ShortLinkRecord>,
    #[serde(default, rename = "invisibleurls")]
    pub invisible_urls: Vec<InvisibleUrlRecord>,
}
