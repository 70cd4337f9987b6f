use axum::body::Body;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use std::sync::Arc;

use crate::api::response::OEmbed;
use crate::compose::{compose_file, FileResponse};
use crate::object_store::StoredObject;
use crate::resolver::{ResolveError, Resolver, INVALID_FILE};
use crate::strategy::Strategy;
use crate::AppState;

/// Route: GET /
pub async fn resolve_root(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, ResolveError> {
    respond(&state, "/", &request_host(&headers, &uri)).await
}

/// Route: GET /*path
///
/// The captured path arrives percent-decoded, so `%E2%80%8B` is already a
/// zero-width space here. A path that does not decode to UTF-8 cannot name any
/// record and is answered like an unknown file.
pub async fn resolve_path(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, ResolveError> {
    let Path(path) = path.map_err(|e| {
        tracing::debug!(path = %uri.path(), error = %e, "Undecodable request path");
        ResolveError::NotFound(INVALID_FILE)
    })?;
    let path = format!("/{path}");
    respond(&state, &path, &request_host(&headers, &uri)).await
}

async fn respond(state: &AppState, path: &str, host: &str) -> Result<Response, ResolveError> {
    let resolver = Resolver::new(state.metadata.as_ref(), host);

    match Strategy::classify(path) {
        Strategy::RootRedirect => redirect(&state.config.site.redirect_url),
        Strategy::OEmbed { filename } => {
            let (title, author) = resolver.oembed(filename)?;
            Ok(OEmbed::link(title, author).into_response())
        }
        Strategy::ShortLink { short_id } => {
            let destination = resolver.short_link(short_id)?;
            tracing::debug!(short_id, destination = %destination, "Following short link");
            redirect(&destination)
        }
        Strategy::File { key } => {
            let file = resolver.file(key)?;
            match compose_file(state, &file, host).await? {
                FileResponse::Page(markup) => Ok(Html(markup.into_string()).into_response()),
                FileResponse::Raw(object) => raw(object),
            }
        }
        Strategy::NoOp => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// Raw `Host` header, falling back to the request URI's authority.
fn request_host(headers: &HeaderMap, uri: &Uri) -> String {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .unwrap_or_default()
        .to_string()
}

fn redirect(location: &str) -> Result<Response, ResolveError> {
    let location = HeaderValue::from_str(location)
        .map_err(|e| ResolveError::Render(format!("invalid redirect target: {e}")))?;
    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response())
}

/// Pass upstream bytes through, forwarding the upstream content type verbatim.
fn raw(object: StoredObject) -> Result<Response, ResolveError> {
    let mut response = Response::new(Body::from(object.data));
    if let Some(content_type) = object.content_type {
        let value = HeaderValue::from_str(&content_type)
            .map_err(|e| ResolveError::Render(format!("invalid upstream content type: {e}")))?;
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::create_router;
    use crate::api::response::ErrorEnvelope;
    use crate::resolver::{INVALID_INVISIBLE_URL, INVALID_SHORT_LINK};
    use crate::storage::models::{InvisibleUrlRecord, ShortLinkRecord};
    use crate::testutil::{sample_file, test_state, write_object};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn get(state: &Arc<AppState>, uri: &str, host: &str) -> Response {
        create_router(Arc::clone(state))
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header(header::HOST, host)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    fn content_type(response: &Response) -> Option<&str> {
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap()
    }

    async fn error_message(response: Response) -> String {
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(content_type(&response), Some("application/json"));
        let envelope: ErrorEnvelope = serde_json::from_slice(&body(response).await).unwrap();
        assert!(!envelope.success);
        envelope.error
    }

    #[tokio::test]
    async fn test_root_redirects_to_site() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _db) = test_state(&dir);

        let response = get(&state, "/", "i.example.com").await;
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(location(&response), "https://higure.wtf");
        assert!(body(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_oembed_document() {
        let dir = tempfile::tempdir().unwrap();
        let (state, db) = test_state(&dir);
        let mut file = sample_file("pic.png", "image/png");
        file.embed.title = "{domain} upload".to_string();
        file.embed.author = "by {domain}".to_string();
        db.put_file(&file).unwrap();

        let response = get(&state, "/pic.png.json", "i.example.com").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(content_type(&response), Some("application/json"));

        let json: serde_json::Value = serde_json::from_slice(&body(response).await).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "version": "1.0",
                "type": "link",
                "title": "i.example.com upload",
                "author_name": "by i.example.com",
            })
        );
    }

    #[tokio::test]
    async fn test_oembed_unknown_file() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _db) = test_state(&dir);

        let response = get(&state, "/nope.png.json", "h").await;
        assert_eq!(error_message(response).await, INVALID_FILE);
    }

    #[tokio::test]
    async fn test_short_link_redirects() {
        let dir = tempfile::tempdir().unwrap();
        let (state, db) = test_state(&dir);
        db.put_short_link(&ShortLinkRecord {
            short_id: "bare".to_string(),
            destination: "example.com/x".to_string(),
        })
        .unwrap();
        db.put_short_link(&ShortLinkRecord {
            short_id: "full".to_string(),
            destination: "http://example.com/x".to_string(),
        })
        .unwrap();

        let response = get(&state, "/s/bare", "h").await;
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(location(&response), "https://example.com/x");

        let response = get(&state, "/s/full", "h").await;
        assert_eq!(location(&response), "http://example.com/x");
    }

    #[tokio::test]
    async fn test_short_link_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _db) = test_state(&dir);

        let response = get(&state, "/s/missing", "h").await;
        assert_eq!(error_message(response).await, INVALID_SHORT_LINK);
    }

    #[tokio::test]
    async fn test_short_link_with_unencodable_destination() {
        let dir = tempfile::tempdir().unwrap();
        let (state, db) = test_state(&dir);
        db.put_short_link(&ShortLinkRecord {
            short_id: "bad".to_string(),
            destination: "example.com/\nx".to_string(),
        })
        .unwrap();

        let response = get(&state, "/s/bad", "h").await;
        assert!(error_message(response)
            .await
            .starts_with("invalid redirect target"));
    }

    #[tokio::test]
    async fn test_raw_file_passthrough() {
        let dir = tempfile::tempdir().unwrap();
        let (state, db) = test_state(&dir);
        let file = sample_file("archive.zip", "application/zip");
        db.put_file(&file).unwrap();
        write_object(&dir, &file.key, b"PK\x03\x04 raw bytes");

        let response = get(&state, "/archive.zip", "h").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(content_type(&response), Some("application/zip"));
        assert_eq!(body(response).await, b"PK\x03\x04 raw bytes");
    }

    #[tokio::test]
    async fn test_invalid_utf8_path_is_unknown_file() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _db) = test_state(&dir);

        let response = get(&state, "/%FF", "h").await;
        assert_eq!(error_message(response).await, INVALID_FILE);

        let response = get(&state, "/nested/%C3%28.png", "h").await;
        assert_eq!(error_message(response).await, INVALID_FILE);
    }

    #[tokio::test]
    async fn test_show_link_video_passes_bytes_through() {
        let dir = tempfile::tempdir().unwrap();
        let (state, db) = test_state(&dir);
        let mut file = sample_file("clip.mp4", "video/mp4");
        file.show_link = true;
        db.put_file(&file).unwrap();
        write_object(&dir, &file.key, b"\x00\x00\x00\x18ftypmp42");

        let response = get(&state, "/clip.mp4", "h").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(content_type(&response), Some("video/mp4"));
        assert_eq!(body(response).await, b"\x00\x00\x00\x18ftypmp42");
    }

    #[tokio::test]
    async fn test_embed_page_is_html() {
        let dir = tempfile::tempdir().unwrap();
        let (state, db) = test_state(&dir);
        let mut file = sample_file("doc.pdf", "application/pdf");
        file.embed.enabled = true;
        db.put_file(&file).unwrap();
        write_object(&dir, &file.key, b"%PDF");

        let response = get(&state, "/doc.pdf", "i.example.com").await;
        assert!(content_type(&response).unwrap().starts_with("text/html"));
        let html = String::from_utf8(body(response).await).unwrap();
        assert!(html.contains(">Download</a>"));
        assert!(!html.contains("<img"));
        assert!(!html.contains("<video"));
    }

    #[tokio::test]
    async fn test_invisible_alias_matches_direct_request() {
        let dir = tempfile::tempdir().unwrap();
        let (state, db) = test_state(&dir);
        let mut file = sample_file("pic.png", "image/png");
        file.embed.enabled = true;
        db.put_file(&file).unwrap();
        db.put_invisible_url(&InvisibleUrlRecord {
            id: "abc\u{200B}".to_string(),
            filename: "pic.png".to_string(),
        })
        .unwrap();
        write_object(&dir, &file.key, b"png");

        let direct = body(get(&state, "/pic.png", "i.example.com").await).await;
        let aliased = body(get(&state, "/abc%E2%80%8B", "i.example.com").await).await;
        assert_eq!(direct, aliased);

        let html = String::from_utf8(aliased).unwrap();
        assert!(html.contains("https://i.example.com/pic.png.json"));
    }

    #[tokio::test]
    async fn test_invisible_alias_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _db) = test_state(&dir);

        let response = get(&state, "/nothing%E2%80%8B", "h").await;
        assert_eq!(error_message(response).await, INVALID_INVISIBLE_URL);
    }

    #[tokio::test]
    async fn test_restricted_domain_looks_like_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let (state, db) = test_state(&dir);
        let mut file = sample_file("secret.png", "image/png");
        file.domain = "a.com".to_string();
        file.user_only_domain = true;
        db.put_file(&file).unwrap();
        write_object(&dir, &file.key, b"png");

        let rejected = body(get(&state, "/secret.png", "b.com").await).await;
        let missing = body(get(&state, "/absent.png", "b.com").await).await;
        assert_eq!(rejected, missing);

        let allowed = get(&state, "/secret.png", "a.com").await;
        assert_eq!(content_type(&allowed), Some("image/png"));
    }

    #[tokio::test]
    async fn test_upstream_failure_reports_error_text() {
        let dir = tempfile::tempdir().unwrap();
        let (state, db) = test_state(&dir);
        let file = sample_file("lost.png", "image/png");
        db.put_file(&file).unwrap();

        let response = get(&state, "/lost.png", "h").await;
        assert_eq!(
            error_message(response).await,
            format!("Object not found: {}", file.key)
        );
    }

    #[tokio::test]
    async fn test_noop_paths() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _db) = test_state(&dir);

        let response = get(&state, "/favicon.ico", "h").await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(body(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _db) = test_state(&dir);

        let response = get(&state, "/_internal/health", "h").await;
        let json: serde_json::Value = serde_json::from_slice(&body(response).await).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[test]
    fn test_request_host_prefers_header() {
        let mut headers = HeaderMap::new();
        let uri: Uri = "http://authority.example/x".parse().unwrap();
        assert_eq!(request_host(&headers, &uri), "authority.example");

        headers.insert(header::HOST, HeaderValue::from_static("i.example.com:8080"));
        assert_eq!(request_host(&headers, &uri), "i.example.com:8080");

        let relative: Uri = "/x".parse().unwrap();
        assert_eq!(request_host(&HeaderMap::new(), &relative), "");
    }
}
