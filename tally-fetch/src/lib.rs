// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Tally Fetch
//!
//! Content retrieval for the Tally counting pipeline.
//!
//! Every subject is turned into a byte stream by one of two interchangeable
//! strategies, picked by the subject's [`SubjectKind`](tally_core::SubjectKind):
//!
//! ## Host APIs
//!
//! - [`host::fs`] - Local files opened with `tokio::fs`
//! - [`host::http`] - HTTP GET bound to the task's cancellation token
//!
//! ## Strategy & Context
//!
//! - [`strategy::ContentSource`] - Trait both strategies implement
//! - [`context::FetchContext`] - The capability set handed to workers
//!
//! ## Example
//!
//! ```ignore
//! use tally_core::{CancellationToken, SubjectKind};
//! use tally_fetch::FetchContext;
//!
//! let ctx = FetchContext::builder().build()?;
//! let kind = SubjectKind::classify("https://example.com")?;
//! let stream = ctx.open(kind, "https://example.com", &CancellationToken::new()).await?;
//! ```

pub mod context;
pub mod error;
pub mod host;
pub mod strategy;

// Errors
pub use error::FetchError;

// Host APIs
pub use host::{fs::LocalFiles, http::HttpClient};

// Strategy & Context
pub use context::{FetchContext, FetchContextBuilder, FetchSettings};
pub use strategy::{ByteStream, ContentSource};
