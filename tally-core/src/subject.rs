//! Subject classification.
//!
//! A subject is one line of input. It names either a remote resource
//! (`http`, `https` or `ftp` URL) or an absolute local path. The URL shape
//! is checked first.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::error::CoreError;

/// Scheme, a dotted host, and an optional path/query tail.
///
/// Word characters are ASCII only; hosts and tails with other letters don't match.
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(http|ftp|https)://([0-9A-Za-z_-]+(?:(?:\.[0-9A-Za-z_-]+)+))([0-9A-Za-z_.,@?^=%&:/~+#-]*[0-9A-Za-z_@?^=%&/~+#-])?$",
    )
    .expect("Invalid regex")
});

/// Leading separator, any number of directories, non-empty basename.
static PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/(.+/)*(.+)$").expect("Invalid regex"));

// ============================================================================
// Subject Kind
// ============================================================================

/// Which retrieval strategy a subject needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    /// Remote resource fetched over the network.
    Url,
    /// Absolute path on the local file system.
    Path,
}

impl SubjectKind {
    /// Classifies a subject.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnrecognizedSubject`] when the subject matches
    /// neither shape.
    pub fn classify(subject: &str) -> Result<Self, CoreError> {
        if URL_RE.is_match(subject) {
            Ok(Self::Url)
        } else if PATH_RE.is_match(subject) {
            Ok(Self::Path)
        } else {
            Err(CoreError::UnrecognizedSubject(subject.to_string()))
        }
    }

    /// Returns the display name for this kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Url => "URL",
            Self::Path => "Path",
        }
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Tests
// ============================================================================
