//! Fan-in of several output streams into one.
//!
//! [`merge`] takes any number of streams of the same item type and yields
//! their items as they arrive. Each source finishes independently; a finished
//! source is simply dropped from the set and the rest keep being served. The
//! merged stream ends once every source has ended. When several sources are
//! ready at once the order is unspecified.
//!
//! Sources with different item types are mapped into a common type first,
//! which is what [`merge_outcomes`] does for the pool's two output queues.

use std::pin::Pin;
use std::task::{Context, Poll};

use async_channel::Receiver;
use futures::stream::{select_all, BoxStream, SelectAll};
use futures::{Stream, StreamExt};
use tally_core::{CountResult, Outcome, TaskFailure};

/// A merged stream over a dynamic set of sources.
pub struct FanIn<T> {
    sources: SelectAll<BoxStream<'static, T>>,
}

impl<T: Send + 'static> FanIn<T> {
    /// Creates a fan-in with no sources. It ends immediately unless sources are pushed.
    pub fn new() -> Self {
        Self {
            sources: SelectAll::new(),
        }
    }

    /// Adds another source.
    pub fn push<S>(&mut self, source: S)
    where
        S: Stream<Item = T> + Send + 'static,
    {
        self.sources.push(source.boxed());
    }
}

impl<T> FanIn<T> {
    /// Returns the number of sources that have not finished yet.
    pub fn open_sources(&self) -> usize {
        self.sources.len()
    }

    /// Returns true once every source has finished.
    pub fn is_terminated(&self) -> bool {
        self.sources.is_empty()
    }
}

impl<T: Send + 'static> Default for FanIn<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Stream for FanIn<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.sources.poll_next_unpin(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.sources.size_hint()
    }
}

impl<T> std::fmt::Debug for FanIn<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanIn")
            .field("open_sources", &self.open_sources())
            .finish()
    }
}

/// Merges any number of streams into one.
pub fn merge<T, S, I>(sources: I) -> FanIn<T>
where
    T: Send + 'static,
    S: Stream<Item = T> + Send + 'static,
    I: IntoIterator<Item = S>,
{
    FanIn {
        sources: select_all(sources.into_iter().map(StreamExt::boxed)),
    }
}

/// Merges a pool's result and failure queues into one stream of outcomes.
pub fn merge_outcomes(
    results: Receiver<CountResult>,
    failures: Receiver<TaskFailure>,
) -> FanIn<Outcome> {
    merge([
        results.map(Outcome::Counted).boxed(),
        failures.map(Outcome::Failed).boxed(),
    ])
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use tally_core::FailureKind;

    #[tokio::test]
    async fn test_merge_drains_every_source() {
        let merged = merge(vec![
            stream::iter(vec![1, 2, 3]),
            stream::iter(vec![]),
            stream::iter(vec![4, 5]),
        ]);

        let mut items: Vec<i32> = merged.collect().await;
        items.sort_unstable();

        assert_eq!(items, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_no_sources_ends_immediately() {
        let mut merged: FanIn<u8> = FanIn::new();
        assert!(merged.is_terminated());
        assert_eq!(merged.next().await, None);
    }

    #[tokio::test]
    async fn test_one_source_closing_keeps_the_other_alive() {
        let (results_tx, results_rx) = async_channel::bounded(1);
        let (failures_tx, failures_rx) = async_channel::bounded(1);
        let mut merged = merge_outcomes(results_rx, failures_rx);

        results_tx.close();
        failures_tx
            .send(TaskFailure::new("/x", FailureKind::Fetch, "not found"))
            .await
            .unwrap();

        let first = merged.next().await.unwrap();
        assert_eq!(first.subject(), "/x");

        drop(failures_tx);
        assert_eq!(merged.next().await, None);
        assert!(merged.is_terminated());
    }

    #[tokio::test]
    async fn test_waits_for_slow_source() {
        let (tx, rx) = async_channel::bounded::<u32>(1);
        let mut merged = merge([rx]);

        let producer = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            tx.send(7).await.unwrap();
        });

        assert_eq!(merged.next().await, Some(7));
        producer.await.unwrap();
        assert_eq!(merged.next().await, None);
    }

    #[tokio::test]
    async fn test_push_adds_source() {
        let mut merged = FanIn::new();
        merged.push(stream::iter(vec!["a"]));
        merged.push(stream::iter(vec!["b"]));
        assert_eq!(merged.open_sources(), 2);

        let mut items: Vec<&str> = merged.collect().await;
        items.sort_unstable();
        assert_eq!(items, vec!["a", "b"]);
    }
}
