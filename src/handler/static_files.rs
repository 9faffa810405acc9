//! Static file serving module
//!
//! Resolves a request against the root directory and serves files, index
//! files, and directory listings.

use crate::config::AppState;
use crate::error::RequestError;
use crate::handler::listing;
use crate::handler::path::{self, RequestTarget};
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve whatever the request path points at under the root
pub async fn serve_path(
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, RequestError> {
    let target = path::translate_path(&state.root, ctx.path)?;

    let metadata = fs::metadata(&target.fs_path).await?;
    path::ensure_within_root(&state.root, &target.fs_path).await?;

    if metadata.is_dir() {
        return serve_directory(ctx, state, &target).await;
    }

    // A file cannot be addressed like a directory
    if target.trailing_slash {
        return Err(RequestError::NotFound);
    }

    serve_file(ctx, &target.fs_path).await
}

/// Serve a directory: redirect to the slash form, then index file, then listing
async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &AppState,
    target: &RequestTarget,
) -> Result<Response<Full<Bytes>>, RequestError> {
    if !ctx.path.ends_with('/') {
        // A leading `//` would make the Location a scheme-relative URL to another host
        let path = ctx.path.trim_start_matches('/');
        let location = match ctx.query {
            Some(query) => format!("/{path}/?{query}"),
            None => format!("/{path}/"),
        };
        return Ok(http::build_redirect_response(&location));
    }

    for index_file in &state.index_files {
        let index_path = target.fs_path.join(index_file);
        if fs::metadata(&index_path).await.is_ok_and(|m| m.is_file()) {
            path::ensure_within_root(&state.root, &index_path).await?;
            return serve_file(ctx, &index_path).await;
        }
    }

    let entries = listing::read_entries(&target.fs_path).await?;
    let html = listing::render_listing(&target.decoded, &entries);
    Ok(http::build_html_response(html, ctx.is_head))
}

/// Serve a regular file, honouring `If-Modified-Since`
async fn serve_file(
    ctx: &RequestContext<'_>,
    file_path: &Path,
) -> Result<Response<Full<Bytes>>, RequestError> {
    let metadata = fs::metadata(file_path).await?;
    let modified = metadata.modified()?;
    let last_modified = cache::format_http_date(modified);

    if cache::is_not_modified(
        ctx.if_modified_since.as_deref(),
        ctx.has_if_none_match,
        modified,
    ) {
        return Ok(http::build_304_response(&last_modified));
    }

    let content = fs::read(file_path).await?;

    Ok(http::build_file_response(
        Bytes::from(content),
        mime::content_type_for(file_path),
        &last_modified,
        ctx.is_head,
    ))
}
