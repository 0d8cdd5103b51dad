//! Content source trait.
//!
//! A content source represents one way of turning a subject into bytes.
//! There is one per [`SubjectKind`]: local files and remote URLs.

use async_trait::async_trait;
use std::pin::Pin;
use tally_core::{CancellationToken, SubjectKind};
use tokio::io::AsyncRead;

use crate::error::FetchError;

/// An owned, readable byte stream. Dropping it releases the file or connection.
pub type ByteStream = Pin<Box<dyn AsyncRead + Send>>;

/// A strategy for opening a subject's content.
///
/// ## Implementing a Source
///
/// ```ignore
/// struct StaticSource(&'static str);
///
/// #[async_trait]
/// impl ContentSource for StaticSource {
///     fn id(&self) -> &str {
///         "static"
///     }
///
///     fn kind(&self) -> SubjectKind {
///         SubjectKind::Path
///     }
///
///     async fn open(&self, _subject: &str, _cancel: &CancellationToken) -> Result<ByteStream, FetchError> {
///         Ok(Box::pin(std::io::Cursor::new(self.0.as_bytes())))
///     }
/// }
/// ```
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Identifier used in logs (e.g., "fs", "http").
    fn id(&self) -> &str;

    /// The kind of subject this source can open.
    fn kind(&self) -> SubjectKind;

    /// Opens the subject for reading.
    ///
    /// Sources that perform network I/O must abort when `cancel` fires and
    /// return [`FetchError::Cancelled`]. Local sources may ignore it.
    async fn open(
        &self,
        subject: &str,
        cancel: &CancellationToken,
    ) -> Result<ByteStream, FetchError>;
}
