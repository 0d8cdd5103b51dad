//! Fetch error types.

use thiserror::Error;

/// Error type for opening a subject's content.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed (connection, DNS, unsupported scheme, or error status).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Local file does not exist.
    #[error("File not found: {0}")]
    NotFound(String),

    /// Local file exists but could not be opened.
    #[error("Failed to open {path}: {source}")]
    Io {
        /// Path that was opened.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The task's token fired before the request completed.
    #[error("Request cancelled")]
    Cancelled,

    /// No strategy is registered for the subject's kind.
    #[error("No content source for {0}")]
    NoSource(String),
}

impl FetchError {
    /// Builds the error for a failed local open, keeping "not found" distinct.
    pub fn from_io(path: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            FetchError::NotFound(path.to_string())
        } else {
            FetchError::Io {
                path: path.to_string(),
                source,
            }
        }
    }

    /// Returns true if this error is the result of cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}
