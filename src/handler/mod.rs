//! Request handler module
//!
//! Top-level dispatch: health probes, the rendered pages and the contacts API.

pub mod pages;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
