//! HTTP protocol layer module
//!
//! Response builders, conditional-request helpers and body reading shared by
//! the page routes and the contacts API.

pub mod body;
pub mod cache;
pub mod response;

// Re-export commonly used types
pub use body::{read_body, BodyError};
pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_error_response, build_health_response, build_html_response, build_json_response,
};
