// API error-to-response mapping

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use thiserror::Error;

use crate::http;
use crate::logger;
use crate::store::StoreError;

/// Anything that ends a contacts request early
#[derive(Error, Debug)]
pub enum ApiError {
    /// Body missing, malformed or of the wrong shape
    #[error("{0}")]
    BadRequest(String),

    /// Body above `http.max_body_size`
    #[error("request body exceeds {0} bytes")]
    PayloadTooLarge(u64),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Blocking store task panicked or was cancelled
    #[error("store task failed: {0}")]
    Task(String),
}

impl ApiError {
    pub fn into_response(self) -> Response<Full<Bytes>> {
        match self {
            Self::BadRequest(message) => http::build_error_response(StatusCode::BAD_REQUEST, &message),
            Self::PayloadTooLarge(max) => http::build_413_response(max),
            Self::Store(err @ StoreError::NotFound(_)) => {
                http::build_error_response(StatusCode::NOT_FOUND, &err.to_string())
            }
            Self::Store(err @ StoreError::Validation(_)) => {
                http::build_error_response(StatusCode::BAD_REQUEST, &err.to_string())
            }
            Self::Store(err @ StoreError::Unsupported { .. }) => {
                http::build_error_response(StatusCode::METHOD_NOT_ALLOWED, &err.to_string())
            }
            Self::Store(err @ StoreError::Database(_)) => internal_error(&err),
            task @ Self::Task(_) => internal_error(&task),
        }
    }
}

/// Log the detail, answer with a generic 500
fn internal_error(err: &dyn std::error::Error) -> Response<Full<Bytes>> {
    logger::log_error(&format!("Contacts request failed: {err}"));
    http::build_error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::BadRequest("Invalid JSON".into()), StatusCode::BAD_REQUEST),
            (ApiError::PayloadTooLarge(10), StatusCode::PAYLOAD_TOO_LARGE),
            (StoreError::NotFound(1).into(), StatusCode::NOT_FOUND),
            (
                StoreError::Validation("blank".into()).into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                StoreError::Unsupported {
                    operation: "get",
                    backend: "memory",
                }
                .into(),
                StatusCode::METHOD_NOT_ALLOWED,
            ),
            (
                StoreError::Database(rusqlite::Error::InvalidQuery).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::Task("panicked".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
