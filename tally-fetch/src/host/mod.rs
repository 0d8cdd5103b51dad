//! Host APIs used as content sources.
//!
//! - [`fs`] - Local files
//! - [`http`] - HTTP client with tracing and cancellation

pub mod fs;
pub mod http;

// Re-export key types
pub use fs::LocalFiles;
pub use http::HttpClient;
