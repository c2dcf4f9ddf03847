//! HTTP response building module
//!
//! Builders used by the asset store and the responder. A builder failure is
//! logged and degrades to a bare response with the intended status.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, ETAG, LOCATION};
use hyper::{Response, StatusCode};

/// Body of the synthetic response sent when neither the asset nor the index resolves
pub const NOT_FOUND_BODY: &str = "Not Found";

/// Build 200 response for a resolved asset
///
/// `Content-Length` always reflects the asset size, even when the body is
/// suppressed for HEAD.
pub fn build_asset_response(
    data: Vec<u8>,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { Bytes::from(data) };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .header(ETAG, etag)
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback(StatusCode::OK, "", &e))
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(ETAG, etag)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback(StatusCode::NOT_MODIFIED, "", &e))
}

/// Build 307 redirect used to add a directory's trailing slash
pub fn build_redirect_response(location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::TEMPORARY_REDIRECT)
        .header(LOCATION, location)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback(StatusCode::TEMPORARY_REDIRECT, "", &e))
}

/// Build the asset store's 404 for a path it cannot resolve
pub fn build_404_response() -> Response<Full<Bytes>> {
    plain_text(StatusCode::NOT_FOUND, "404 Not Found")
}

/// Build the responder's terminal 404
pub fn build_not_found_response() -> Response<Full<Bytes>> {
    plain_text(StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}

/// Build 500 response for a failed asset lookup
pub fn build_500_response() -> Response<Full<Bytes>> {
    plain_text(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error")
}

fn plain_text(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from_static(body.as_bytes())))
        .unwrap_or_else(|e| fallback(status, body, &e))
}

fn fallback(status: StatusCode, body: &'static str, error: &hyper::http::Error) -> Response<Full<Bytes>> {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
    let mut response = Response::new(Full::new(Bytes::from_static(body.as_bytes())));
    *response.status_mut() = status;
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(response: Response<Full<Bytes>>) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_not_found_response_is_plain_not_found() {
        let response = build_not_found_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_of(response).await, "Not Found");
    }

    #[tokio::test]
    async fn test_head_asset_keeps_length_without_body() {
        let response = build_asset_response(b"body { }".to_vec(), "text/css", "\"e1\"", true);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_LENGTH], "8");
        assert_eq!(response.headers()[ETAG], "\"e1\"");
        assert!(body_of(response).await.is_empty());
    }

    #[test]
    fn test_redirect_sets_location() {
        let response = build_redirect_response("/docs/?v=2");
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[LOCATION], "/docs/?v=2");
    }

    #[test]
    fn test_304_carries_etag() {
        let response = build_304_response("\"e1\"");
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(response.headers()[ETAG], "\"e1\"");
    }
}
