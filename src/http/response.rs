//! HTTP response building module
//!
//! Builders for every status the service emits, decoupled from the contact logic.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

const JSON: &str = "application/json";
const HTML: &str = "text/html; charset=utf-8";
const TEXT: &str = "text/plain; charset=utf-8";

/// Serialize `body` as JSON with the given status
pub fn build_json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(json) => build(status, JSON, Bytes::from(json), "JSON"),
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            build(
                StatusCode::INTERNAL_SERVER_ERROR,
                JSON,
                Bytes::from_static(br#"{"error":"Internal server error","code":500}"#),
                "500",
            )
        }
    }
}

/// `{"error": message, "code": status}`
pub fn build_error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    build_json_response(
        status,
        &serde_json::json!({ "error": message, "code": status.as_u16() }),
    )
}

/// 405 with the methods the resource does accept
pub fn build_405_response(allow: &str) -> Response<Full<Bytes>> {
    let mut resp = build_error_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
    match allow.parse::<hyper::header::HeaderValue>() {
        Ok(value) => {
            resp.headers_mut().insert(hyper::header::ALLOW, value);
        }
        Err(e) => log_build_error("405", &e),
    }
    resp
}

/// 413 Payload Too Large
pub fn build_413_response(max_body_size: u64) -> Response<Full<Bytes>> {
    build_error_response(
        StatusCode::PAYLOAD_TOO_LARGE,
        &format!("Request body exceeds {max_body_size} bytes"),
    )
}

/// Plain-text 404 for unknown non-API paths
pub fn build_404_response() -> Response<Full<Bytes>> {
    build(
        StatusCode::NOT_FOUND,
        TEXT,
        Bytes::from_static(b"404 Not Found"),
        "404",
    )
}

/// Plain-text probe response
pub fn build_health_response(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    let mut resp = build(status, TEXT, Bytes::from_static(body.as_bytes()), "health");
    resp.headers_mut().insert(
        hyper::header::CACHE_CONTROL,
        hyper::header::HeaderValue::from_static("no-store"),
    );
    resp
}

/// Rendered page with `ETag`; body omitted for HEAD
pub fn build_html_response(content: String, etag: &str, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", HTML)
        .header("Content-Length", content_length)
        .header("ETag", etag)
        .header("Cache-Control", "no-cache")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header("ETag", etag)
        .header("Cache-Control", "no-cache")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

fn build(
    status: StatusCode,
    content_type: &'static str,
    body: Bytes,
    label: &str,
) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", content_type)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(label, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &dyn std::fmt::Display) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(resp: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_error_response_shape() {
        let resp = build_error_response(StatusCode::NOT_FOUND, "Contact 9 not found");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()["content-type"], JSON);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "Contact 9 not found");
        assert_eq!(body["code"], 404);
    }

    #[test]
    fn test_405_sets_allow() {
        let resp = build_405_response("GET, POST");
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()["allow"], "GET, POST");
    }

    #[tokio::test]
    async fn test_head_page_has_length_but_no_body() {
        let resp = build_html_response("<p>hi</p>".to_string(), "\"abc\"", true);
        assert_eq!(resp.headers()["content-length"], "9");
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }
}
