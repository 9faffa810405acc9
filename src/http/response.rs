//! HTTP response building module
//!
//! Provides builders for the responses the file server sends, decoupled from
//! request handling.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

/// Build 200 response for a file
///
/// `Content-Length` always reflects the file size, even for HEAD.
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    last_modified: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Last-Modified", last_modified)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 304 Not Modified response
pub fn build_304_response(last_modified: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header("Last-Modified", last_modified)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build generic HTML response
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 301 redirect response
pub fn build_redirect_response(location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header("Location", location)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Length", 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a plain-text error response, e.g. `404 Not Found`
pub fn build_error_response(status: StatusCode, is_head: bool) -> Response<Full<Bytes>> {
    let text = format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error")
    );
    let content_length = text.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(text)
    };

    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            let mut resp = Response::new(Full::new(Bytes::new()));
            *resp.status_mut() = status;
            resp
        })
}

/// Build 501 Not Implemented response for unsupported methods
pub fn build_501_response() -> Response<Full<Bytes>> {
    let mut resp = build_error_response(StatusCode::NOT_IMPLEMENTED, false);
    resp.headers_mut()
        .insert("Allow", hyper::header::HeaderValue::from_static("GET, HEAD"));
    resp
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::body::Body;

    fn body_len(resp: &Response<Full<Bytes>>) -> Option<u64> {
        resp.body().size_hint().exact()
    }

    #[test]
    fn test_file_response_headers() {
        let resp = build_file_response(
            Bytes::from_static(b"hi"),
            "text/plain; charset=utf-8",
            "Sun, 06 Nov 1994 08:49:37 GMT",
            false,
        );
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Content-Type"], "text/plain; charset=utf-8");
        assert_eq!(resp.headers()["Content-Length"], "2");
        assert_eq!(resp.headers()["Last-Modified"], "Sun, 06 Nov 1994 08:49:37 GMT");
        assert_eq!(body_len(&resp), Some(2));
    }

    #[test]
    fn test_head_keeps_length_drops_body() {
        let resp = build_file_response(
            Bytes::from_static(b"hello"),
            "text/plain; charset=utf-8",
            "Sun, 06 Nov 1994 08:49:37 GMT",
            true,
        );
        assert_eq!(resp.headers()["Content-Length"], "5");
        assert_eq!(body_len(&resp), Some(0));
    }

    #[test]
    fn test_error_response() {
        let resp = build_error_response(StatusCode::NOT_FOUND, false);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_len(&resp), Some("404 Not Found".len() as u64));

        let resp = build_error_response(StatusCode::INTERNAL_SERVER_ERROR, true);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_len(&resp), Some(0));
    }

    #[test]
    fn test_501_lists_allowed_methods() {
        let resp = build_501_response();
        assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(resp.headers()["Allow"], "GET, HEAD");
    }

    #[test]
    fn test_redirect_response() {
        let resp = build_redirect_response("/docs/?page=2");
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()["Location"], "/docs/?page=2");
    }
}
