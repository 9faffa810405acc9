//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, dispatch to
//! the static file handler, error mapping, and access logging.

use crate::config::AppState;
use crate::error::RequestError;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, SERVER};
use hyper::{Method, Request, Response, StatusCode, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) URL path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<String>,
    pub has_if_none_match: bool,
}

/// Main entry point for HTTP request handling
///
/// Never fails: every fault becomes an HTTP status on this response only.
/// The request body is never read.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let mut response = route_request(&req, &state).await;

    if let Ok(server) = HeaderValue::from_str(&state.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if state.access_log {
        log_access(&req, &response, peer_addr, &state.access_log_format);
    }

    Ok(response)
}

async fn route_request<B>(req: &Request<B>, state: &AppState) -> Response<Full<Bytes>> {
    if let Some(resp) = check_http_method(req.method()) {
        return resp;
    }

    let ctx = RequestContext {
        path: req.uri().path(),
        query: req.uri().query(),
        is_head: req.method() == Method::HEAD,
        if_modified_since: req
            .headers()
            .get("if-modified-since")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
        has_if_none_match: req.headers().contains_key("if-none-match"),
    };

    match static_files::serve_path(&ctx, state).await {
        Ok(resp) => resp,
        Err(err) => error_response(&ctx, &err),
    }
}

/// Only GET and HEAD are served
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        _ => {
            logger::log_warning(&format!("Unsupported method: {method}"));
            Some(http::build_501_response())
        }
    }
}

fn error_response(ctx: &RequestContext<'_>, err: &RequestError) -> Response<Full<Bytes>> {
    let status = err.status();
    match err {
        RequestError::OutsideRoot(resolved) => logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            ctx.path,
            resolved.display()
        )),
        _ if status == StatusCode::INTERNAL_SERVER_ERROR => {
            logger::log_error(&format!("Failed to serve '{}': {err}", ctx.path));
        }
        // Missing files are routine
        _ => {}
    }
    http::build_error_response(status, ctx.is_head)
}

fn log_access<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    format: &str,
) {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");

    logger::log_access(&entry, format);
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
