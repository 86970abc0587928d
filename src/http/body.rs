//! Request body reading with a size cap.

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::HeaderMap;

use crate::logger;

#[derive(Debug, PartialEq, Eq)]
pub enum BodyError {
    /// Declared or actual size is above the limit
    TooLarge,
    /// Connection failed while reading
    Read(String),
}

/// Collect the whole body, refusing anything over `max_body_size` bytes.
///
/// A declared `Content-Length` over the limit is rejected without reading.
pub async fn read_body<B>(
    headers: &HeaderMap,
    body: B,
    max_body_size: u64,
) -> Result<Bytes, BodyError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    if declared_length(headers).is_some_and(|len| len > max_body_size) {
        return Err(BodyError::TooLarge);
    }

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => Err(BodyError::TooLarge),
        Err(e) => Err(BodyError::Read(e.to_string())),
    }
}

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    let value = headers.get(hyper::header::CONTENT_LENGTH)?;
    let Ok(text) = value.to_str() else {
        logger::log_warning("Content-Length header contains non-ASCII characters");
        return None;
    };
    match text.parse::<u64>() {
        Ok(len) => Some(len),
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{text}', skipping size check"
            ));
            None
        }
    }
}
