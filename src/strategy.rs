//! Maps a request path onto the way it is served.

/// Suffix marking an invisible URL alias.
pub const ZERO_WIDTH_SPACE: char = '\u{200B}';

const OEMBED_SUFFIX: &str = ".json";
const SHORT_LINK_PREFIX: &str = "/s/";

/// Resolution strategy for one request, borrowing its routing key from the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy<'a> {
    /// `/` redirects to the marketing site.
    RootRedirect,
    /// `/<filename>.json` returns oEmbed metadata for `filename`.
    OEmbed { filename: &'a str },
    /// `/s/<shortId>` redirects to the short link destination.
    ShortLink { short_id: &'a str },
    /// `/<filename>` or `/<alias>\u{200B}` serves a file.
    File { key: &'a str },
    /// Empty base segment or `favicon.ico`.
    NoOp,
}

impl<'a> Strategy<'a> {
    /// Classify a decoded request path. The first matching rule wins.
    pub fn classify(path: &'a str) -> Self {
        if path == "/" {
            return Strategy::RootRedirect;
        }

        let base = base_segment(path);

        if let Some(filename) = base.strip_suffix(OEMBED_SUFFIX) {
            return Strategy::OEmbed { filename };
        }

        if path.starts_with(SHORT_LINK_PREFIX) && base != "s" {
            return Strategy::ShortLink { short_id: base };
        }

        if !base.is_empty() && base != "favicon.ico" {
            return Strategy::File { key: base };
        }

        Strategy::NoOp
    }
}

/// Final segment of a path, ignoring trailing slashes.
pub fn base_segment(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or("")
}

/// Whether a file key names an invisible URL alias rather than a filename.
pub fn is_invisible_key(key: &str) -> bool {
    key.ends_with(ZERO_WIDTH_SPACE)
}
