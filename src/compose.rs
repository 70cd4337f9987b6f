//! Chooses how a resolved file is served: embed page, show-link page or raw bytes.

use maud::Markup;

use crate::object_store::StoredObject;
use crate::render::{EmbedPage, ShowLinkPage};
use crate::resolver::{substitute_domain, ResolveError};
use crate::storage::models::FileRecord;
use crate::AppState;

/// Body chosen for a file-resolve request.
#[derive(Debug)]
pub enum FileResponse {
    /// Rendered HTML page.
    Page(Markup),
    /// Upstream bytes with the upstream content type.
    Raw(StoredObject),
}

/// Fetch the file's bytes and pick its representation from the record flags.
///
/// The fetch always happens first, so an unreachable object fails the request
/// even when only a page would be rendered.
pub async fn compose_file(
    state: &AppState,
    file: &FileRecord,
    host: &str,
) -> Result<FileResponse, ResolveError> {
    let object = state.object_store.get(&file.key).await.map_err(|e| {
        tracing::error!(filename = %file.filename, key = %file.key, error = %e, "Object fetch failed");
        ResolveError::Upstream(e)
    })?;

    let kind = file.media_kind();
    let file_url = state.config.storage.cdn_url(&file.key);
    let description = substitute_domain(&file.embed.description, host);

    if file.embed.enabled {
        let oembed_url = format!("https://{host}/{}.json", file.filename);
        let page = EmbedPage {
            file_url: &file_url,
            oembed_url: &oembed_url,
            description: &description,
            color: &file.embed.color,
            kind,
            username: &file.uploader.username,
            filename: &file.filename,
            size: &file.size,
            site_name: &state.config.site.site_name,
            stylesheet_url: state.config.site.stylesheet_url.as_deref(),
        };
        return Ok(FileResponse::Page(page.render()));
    }

    if file.show_link && !kind.is_video() {
        return Ok(FileResponse::Page(
            ShowLinkPage {
                file_url: &file_url,
            }
            .render(),
        ));
    }

    Ok(FileResponse::Raw(object))
}
