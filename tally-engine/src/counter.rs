//! Line-oriented substring counting.
//!
//! The counter reads a byte stream one line at a time, strips the line
//! terminator (`\n`, plus a preceding `\r`), and counts non-overlapping,
//! case-sensitive occurrences of the target in each line. The stream does not
//! need to be valid UTF-8.
//!
//! Cancellation is cooperative: the token is checked before the first read,
//! after every line, and once more at end of stream. A line is never
//! interrupted half-way.

use std::sync::Arc;

use tally_core::CancellationToken;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::trace;

use crate::error::CountError;

// ============================================================================
// Scan
// ============================================================================

/// Totals for a fully scanned stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scan {
    /// Non-overlapping occurrences of the target.
    pub occurrences: u64,
    /// Lines scanned (a final unterminated fragment counts as a line).
    pub lines: u64,
}

// ============================================================================
// Counter
// ============================================================================

/// Counts a fixed target substring across streams.
#[derive(Debug, Clone)]
pub struct Counter {
    target: Arc<[u8]>,
}

impl Counter {
    /// Creates a counter for the given target.
    pub fn new(target: &str) -> Self {
        Self {
            target: Arc::from(target.as_bytes()),
        }
    }

    /// Returns the target as bytes.
    pub fn target(&self) -> &[u8] {
        &self.target
    }

    /// Counts occurrences in a single line (terminator already removed).
    pub fn count_line(&self, line: &[u8]) -> u64 {
        count_occurrences(line, &self.target)
    }

    /// Reads `reader` to the end and counts occurrences line by line.
    ///
    /// # Errors
    ///
    /// - [`CountError::Cancelled`] if `cancel` fires; carries the partial count.
    /// - [`CountError::Read`] if the stream fails; carries the partial count.
    pub async fn count<R>(&self, reader: R, cancel: &CancellationToken) -> Result<Scan, CountError>
    where
        R: AsyncRead + Unpin,
    {
        let mut scan = Scan::default();
        if cancel.is_cancelled() {
            return Err(cancelled(scan));
        }

        let mut reader = BufReader::new(reader);
        let mut line = Vec::new();

        loop {
            line.clear();
            let read = match reader.read_until(b'\n', &mut line).await {
                Ok(read) => read,
                Err(source) => {
                    return Err(CountError::Read {
                        counted: scan.occurrences,
                        lines: scan.lines,
                        source,
                    });
                }
            };
            if read == 0 {
                break;
            }

            scan.occurrences += self.count_line(strip_terminator(&line));
            scan.lines += 1;

            if cancel.is_cancelled() {
                return Err(cancelled(scan));
            }
        }

        // A remote body is cut short when its token fires; don't report that as complete.
        if cancel.is_cancelled() {
            return Err(cancelled(scan));
        }

        trace!(lines = scan.lines, occurrences = scan.occurrences, "Stream scanned");
        Ok(scan)
    }
}

fn cancelled(scan: Scan) -> CountError {
    CountError::Cancelled {
        counted: scan.occurrences,
        lines: scan.lines,
    }
}

/// Removes a trailing `\n` and then a trailing `\r`.
fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Counts non-overlapping occurrences of `needle` in `haystack`.
///
/// An empty needle matches nothing.
fn count_occurrences(haystack: &[u8], needle: &[u8]) -> u64 {
    if needle.is_empty() {
        return 0;
    }

    let mut count = 0;
    let mut pos = 0;
    while pos + needle.len() <= haystack.len() {
        if haystack[pos..].starts_with(needle) {
            count += 1;
            pos += needle.len();
        } else {
            pos += 1;
        }
    }
    count
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;

    /// Hands out one line per read and cancels the token after `cancel_after` lines.
    struct CancellingReader {
        lines: Vec<&'static [u8]>,
        next: usize,
        cancel_after: usize,
        cancel: CancellationToken,
    }

    impl AsyncRead for CancellingReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            if let Some(line) = self.lines.get(self.next).copied() {
                buf.put_slice(line);
                self.next += 1;
                if self.next == self.cancel_after {
                    self.cancel.cancel();
                }
            }
            Poll::Ready(Ok(()))
        }
    }

    /// Yields its data and then fails.
    struct FailingReader {
        data: Option<&'static [u8]>,
    }

    impl AsyncRead for FailingReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            match self.data.take() {
                Some(data) => {
                    buf.put_slice(data);
                    Poll::Ready(Ok(()))
                }
                None => Poll::Ready(Err(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "connection reset",
                ))),
            }
        }
    }

    async fn count(target: &str, content: &'static str) -> Scan {
        Counter::new(target)
            .count(Cursor::new(content.as_bytes()), &CancellationToken::new())
            .await
            .unwrap()
    }

    #[test]
    fn test_count_occurrences_non_overlapping() {
        assert_eq!(count_occurrences(b"aaaa", b"aa"), 2);
        assert_eq!(count_occurrences(b"aaa", b"aa"), 1);
        assert_eq!(count_occurrences(b"GoGoGo", b"Go"), 3);
        assert_eq!(count_occurrences(b"go GO gO", b"Go"), 0);
        assert_eq!(count_occurrences(b"G", b"Go"), 0);
        assert_eq!(count_occurrences(b"", b"Go"), 0);
        assert_eq!(count_occurrences(b"anything", b""), 0);
    }

    #[test]
    fn test_target_is_kept_as_bytes() {
        let counter = Counter::new("Gö");
        assert_eq!(counter.target(), "Gö".as_bytes());
        assert_eq!(counter.count_line("Gö, Go, Gö".as_bytes()), 2);
    }

    #[test]
    fn test_strip_terminator() {
        assert_eq!(strip_terminator(b"line\n"), b"line");
        assert_eq!(strip_terminator(b"line\r\n"), b"line");
        assert_eq!(strip_terminator(b"line"), b"line");
        assert_eq!(strip_terminator(b"\n"), b"");
    }

    #[tokio::test]
    async fn test_counts_across_lines() {
        let scan = count("Go", "Go is Go\nLearn Go\nGoogle\n").await;
        assert_eq!(scan, Scan { occurrences: 4, lines: 3 });
    }

    #[tokio::test]
    async fn test_final_fragment_without_terminator_is_scanned() {
        let scan = count("Go", "first\nlast Go").await;
        assert_eq!(scan, Scan { occurrences: 1, lines: 2 });
    }

    #[tokio::test]
    async fn test_match_never_spans_lines() {
        let scan = count("Go", "G\no\nG\r\no").await;
        assert_eq!(scan.occurrences, 0);
    }

    #[tokio::test]
    async fn test_empty_stream() {
        let scan = count("Go", "").await;
        assert_eq!(scan, Scan::default());
    }

    #[tokio::test]
    async fn test_non_utf8_content() {
        let content: &'static [u8] = b"\xff\xfeGo\xc3\n\x80Go";
        let scan = Counter::new("Go")
            .count(Cursor::new(content), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(scan.occurrences, 2);
    }

    #[tokio::test]
    async fn test_counting_is_repeatable() {
        let content = "Go Go\nGo\n";
        let first = count("Go", content).await;
        let second = count("Go", content).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_cancelled_before_first_line() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = Counter::new("Go")
            .count(Cursor::new(b"Go\nGo\n".as_slice()), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, CountError::Cancelled { counted: 0, lines: 0 }));
        assert_eq!(err.to_string(), "Job Cancelled");
    }

    #[tokio::test]
    async fn test_cancelled_before_first_line_with_empty_content() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = Counter::new("Go")
            .count(Cursor::new(b"".as_slice()), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, CountError::Cancelled { .. }));
    }

    #[tokio::test]
    async fn test_cancelled_after_k_lines_keeps_progress() {
        let cancel = CancellationToken::new();
        let reader = CancellingReader {
            lines: vec![b"Go\n", b"Go Go\n", b"Go\n", b"Go\n", b"Go\n"],
            next: 0,
            cancel_after: 3,
            cancel: cancel.clone(),
        };

        let err = Counter::new("Go").count(reader, &cancel).await.unwrap_err();

        match err {
            CountError::Cancelled { counted, lines } => {
                assert_eq!(lines, 3);
                assert_eq!(counted, 4);
            }
            other => panic!("expected cancellation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_read_error_carries_partial_count() {
        let reader = FailingReader {
            data: Some(b"Go\nGo Go\n"),
        };

        let err = Counter::new("Go")
            .count(reader, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, CountError::Read { .. }));
        assert_eq!(err.counted(), 3);
        assert_eq!(err.lines(), 2);
        assert!(err.to_string().contains("connection reset"));
    }
}
