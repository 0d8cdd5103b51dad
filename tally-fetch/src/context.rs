//! Fetch context providing access to content sources.
//!
//! The fetch context is shared by every worker and bundles one source per
//! subject kind plus the settings they were built from.

use std::sync::Arc;
use std::time::Duration;

use tally_core::{CancellationToken, SubjectKind};
use tracing::debug;

use crate::error::FetchError;
use crate::host::{fs::LocalFiles, http::HttpClient};
use crate::strategy::{ByteStream, ContentSource};

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connect timeout.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// User agent string for Tally.
const USER_AGENT: &str = concat!("Tally/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for building the default sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Total timeout for one HTTP request, body included.
    pub timeout: Duration,
    /// Timeout for establishing a connection.
    pub connect_timeout: Duration,
    /// User agent sent with HTTP requests.
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl FetchSettings {
    /// Creates settings with custom timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Creates settings with a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Context provided to workers, giving access to both content sources.
#[derive(Clone)]
pub struct FetchContext {
    /// Source for absolute paths.
    pub local: Arc<dyn ContentSource>,
    /// Source for URLs.
    pub remote: Arc<dyn ContentSource>,
    /// Settings the default sources were built from.
    pub settings: FetchSettings,
}

impl FetchContext {
    /// Creates a builder for customizing the context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::new()
    }

    /// Returns the source responsible for the given kind.
    pub fn source_for(&self, kind: SubjectKind) -> &dyn ContentSource {
        match kind {
            SubjectKind::Path => self.local.as_ref(),
            SubjectKind::Url => self.remote.as_ref(),
        }
    }

    /// Opens a classified subject with the matching source.
    ///
    /// # Errors
    ///
    /// Returns whatever the selected source reports, or
    /// [`FetchError::NoSource`] if the source registered for this kind
    /// declares a different kind.
    pub async fn open(
        &self,
        kind: SubjectKind,
        subject: &str,
        cancel: &CancellationToken,
    ) -> Result<ByteStream, FetchError> {
        let source = self.source_for(kind);
        if source.kind() != kind {
            return Err(FetchError::NoSource(kind.to_string()));
        }
        debug!(source = source.id(), kind = %kind, "Opening subject");
        source.open(subject, cancel).await
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("local", &self.local.id())
            .field("remote", &self.remote.id())
            .field("settings", &self.settings)
            .finish()
    }
}

// ============================================================================
// Fetch Context Builder
// ============================================================================

/// Builder for constructing a `FetchContext`.
#[derive(Default)]
pub struct FetchContextBuilder {
    local: Option<Arc<dyn ContentSource>>,
    remote: Option<Arc<dyn ContentSource>>,
    settings: FetchSettings,
}

impl FetchContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the local file source.
    pub fn local(mut self, local: Arc<dyn ContentSource>) -> Self {
        self.local = Some(local);
        self
    }

    /// Sets the remote source.
    pub fn remote(mut self, remote: Arc<dyn ContentSource>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Sets the fetch settings.
    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the HTTP timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    /// Builds the fetch context, creating default sources where none were set.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the default HTTP client cannot be built.
    pub fn build(self) -> Result<FetchContext, FetchError> {
        let local = self.local.unwrap_or_else(|| Arc::new(LocalFiles::new()));
        let remote = match self.remote {
            Some(remote) => remote,
            None => Arc::new(HttpClient::with_settings(&self.settings)?),
        };

        Ok(FetchContext {
            local,
            remote,
            settings: self.settings,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = FetchSettings::default();
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert!(settings.user_agent.starts_with("Tally/"));
    }

    #[test]
    fn test_context_builder() {
        let ctx = FetchContext::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(ctx.settings.timeout, Duration::from_secs(5));
        assert_eq!(ctx.source_for(SubjectKind::Path).id(), "fs");
        assert_eq!(ctx.source_for(SubjectKind::Url).id(), "http");
    }

    #[tokio::test]
    async fn test_mismatched_source_is_rejected() {
        // Local files registered as the remote source by mistake.
        let ctx = FetchContext::builder()
            .remote(Arc::new(LocalFiles::new()))
            .build()
            .unwrap();

        let result = ctx
            .open(SubjectKind::Url, "https://example.com", &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(FetchError::NoSource(_))));
    }
}
