//! Turns input lines into pool tasks.
//!
//! Every subject gets a child of the run's root token, so cancelling the root
//! (Ctrl-C) cancels every task. With a per-task timeout, a timer cancels the
//! child alone.

use std::time::Duration;

use async_channel::Sender;
use tally_core::{CancellationToken, Task};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

/// Submits subjects to a pool's input queue.
#[derive(Debug)]
pub struct Feed {
    input: Sender<Task>,
    root: CancellationToken,
    timeout: Option<Duration>,
}

impl Feed {
    /// Creates a feed for `input`, deriving task tokens from `root`.
    pub fn new(input: Sender<Task>, root: CancellationToken, timeout: Option<Duration>) -> Self {
        Self {
            input,
            root,
            timeout,
        }
    }

    /// Reads subjects one per line until end of input or until the root is cancelled.
    ///
    /// Lines that are not valid UTF-8 are logged and skipped. Returns the
    /// number of submitted tasks. The input queue closes when the feed is dropped.
    pub async fn from_lines<R>(self, reader: R) -> std::io::Result<usize>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.split(b'\n');
        let mut submitted = 0;

        loop {
            let line = tokio::select! {
                biased;
                () = self.root.cancelled() => break,
                line = lines.next_segment() => line?,
            };
            let Some(line) = line else { break };
            let Ok(line) = std::str::from_utf8(&line) else {
                warn!(bytes = line.len(), "Skipping subject that is not valid UTF-8");
                continue;
            };
            let Some(subject) = normalize(line) else { continue };

            if !self.submit(subject).await {
                break;
            }
            submitted += 1;
        }

        debug!(submitted, "Input exhausted");
        Ok(submitted)
    }

    /// Submits a fixed list of subjects.
    pub async fn from_list(self, subjects: Vec<String>) -> std::io::Result<usize> {
        let mut submitted = 0;
        for subject in &subjects {
            if self.root.is_cancelled() {
                break;
            }
            let Some(subject) = normalize(subject) else { continue };
            if !self.submit(subject).await {
                break;
            }
            submitted += 1;
        }
        Ok(submitted)
    }

    async fn submit(&self, subject: &str) -> bool {
        let cancel = self.root.child_token();
        if let Some(timeout) = self.timeout {
            spawn_timer(cancel.clone(), timeout);
        }

        if self.input.send(Task::with_cancel(subject, cancel)).await.is_err() {
            warn!(subject, "Input queue closed, dropping remaining subjects");
            return false;
        }
        true
    }
}

/// Strips a trailing CR; empty lines yield nothing. Everything else is kept as-is.
fn normalize(line: &str) -> Option<&str> {
    let subject = line.strip_suffix('\r').unwrap_or(line);
    if subject.is_empty() {
        None
    } else {
        Some(subject)
    }
}

/// Cancels `token` after `timeout` unless it is cancelled first.
fn spawn_timer(token: CancellationToken, timeout: Duration) {
    tokio::spawn(async move {
        tokio::select! {
            () = tokio::time::sleep(timeout) => {
                debug!(?timeout, "Task timed out");
                token.cancel();
            }
            () = token.cancelled() => {}
        }
    });
}

// ============================================================================
// Tests
// ============================================================================
