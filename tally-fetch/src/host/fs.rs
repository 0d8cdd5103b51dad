//! Local file source.

use async_trait::async_trait;
use tally_core::{CancellationToken, SubjectKind};
use tokio::fs::File;
use tracing::{debug, instrument};

use crate::error::FetchError;
use crate::strategy::{ByteStream, ContentSource};

/// Opens absolute paths on the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

impl LocalFiles {
    /// Creates a new local file source.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ContentSource for LocalFiles {
    fn id(&self) -> &str {
        "fs"
    }

    fn kind(&self) -> SubjectKind {
        SubjectKind::Path
    }

    #[instrument(skip(self, _cancel), fields(path = %subject))]
    async fn open(
        &self,
        subject: &str,
        _cancel: &CancellationToken,
    ) -> Result<ByteStream, FetchError> {
        let file = File::open(subject)
            .await
            .map_err(|e| FetchError::from_io(subject, e))?;
        debug!("File opened");
        Ok(Box::pin(file))
    }
}

// ============================================================================
// Tests
// ============================================================================
