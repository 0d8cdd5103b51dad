//! HTTP client with tracing and cancellation.
//!
//! The client issues a single GET per subject and hands the response body
//! back as a byte stream. Both the request and the body are bound to the
//! task's cancellation token.

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use reqwest::Client;
use std::io;
use tally_core::{CancellationToken, SubjectKind};
use tokio_util::io::StreamReader;
use tracing::{debug, instrument};

use crate::context::FetchSettings;
use crate::error::FetchError;
use crate::strategy::{ByteStream, ContentSource};

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper used as the remote content source.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_settings(&FetchSettings::default())
    }

    /// Creates a new HTTP client from fetch settings.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the TLS backend cannot be initialised.
    pub fn with_settings(settings: &FetchSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(settings.connect_timeout)
            .user_agent(settings.user_agent.as_str())
            .build()?;

        Ok(Self { inner: client })
    }

    /// Performs a GET request and returns the body as a byte stream.
    ///
    /// Non-success status codes are reported as errors.
    #[instrument(skip(self, cancel), fields(url = %url))]
    pub async fn get_stream(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<ByteStream, FetchError> {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        debug!("GET request");

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("Request cancelled in flight");
                return Err(FetchError::Cancelled);
            }
            response = self.inner.get(url).send() => response?,
        };
        debug!(status = %response.status(), "Response received");
        let response = response.error_for_status()?;

        // Ends the body early once the token fires; the counter notices the
        // cancelled token when it sees the short stream.
        let body = response
            .bytes_stream()
            .map_err(io::Error::other)
            .take_until(cancel.clone().cancelled_owned());

        Ok(Box::pin(StreamReader::new(body)))
    }
}

#[async_trait]
impl ContentSource for HttpClient {
    fn id(&self) -> &str {
        "http"
    }

    fn kind(&self) -> SubjectKind {
        SubjectKind::Url
    }

    async fn open(
        &self,
        subject: &str,
        cancel: &CancellationToken,
    ) -> Result<ByteStream, FetchError> {
        self.get_stream(subject, cancel).await
    }
}

// ============================================================================
// Tests
// ============================================================================
