//! Worker pool and its lifecycle.
//!
//! A pool owns three bounded queues: one shared input queue that every
//! worker receives from, and two output queues (counts and failures). Workers
//! loop until the input queue is closed and drained. A supervisor task joins
//! every worker and only then closes the output queues, so no worker ever
//! sends on a closed queue.

use std::sync::Arc;

use async_channel::{Receiver, Sender};
use futures::future::join_all;
use tally_core::{CountResult, Outcome, Task, TaskFailure};
use tally_fetch::FetchContext;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::PoolError;
use crate::fan_in::{merge_outcomes, FanIn};
use crate::processor::TaskProcessor;

/// Default number of workers.
pub const DEFAULT_WORKERS: usize = 5;

/// Default capacity of each queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1;

// ============================================================================
// Pool Config
// ============================================================================

/// Settings for a worker pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Substring to count.
    pub target: String,
    /// Number of concurrent workers.
    pub workers: usize,
    /// Capacity of the input and output queues.
    pub queue_capacity: usize,
}

impl PoolConfig {
    /// Creates a config with default worker count and queue capacity.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    /// Sets the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the queue capacity.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Checks that the pool can be started with these settings.
    ///
    /// # Errors
    ///
    /// Returns a [`PoolError`] for an empty target, zero workers, or zero capacity.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.target.is_empty() {
            return Err(PoolError::EmptyTarget);
        }
        if self.workers == 0 {
            return Err(PoolError::NoWorkers);
        }
        if self.queue_capacity == 0 {
            return Err(PoolError::ZeroCapacity);
        }
        Ok(())
    }
}

// ============================================================================
// Pool Summary
// ============================================================================

/// Totals reported once every worker has stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolSummary {
    /// Workers that were started.
    pub workers: usize,
    /// Tasks taken off the input queue.
    pub processed: u64,
    /// Tasks that ended in a failure.
    pub failed: u64,
    /// Workers that panicked.
    pub panicked: usize,
}

impl PoolSummary {
    /// Returns the number of tasks that produced a count.
    pub fn succeeded(&self) -> u64 {
        self.processed - self.failed
    }
}

/// Per-worker tally returned from the worker task.
#[derive(Debug, Clone, Copy, Default)]
struct WorkerReport {
    processed: u64,
    failed: u64,
}

// ============================================================================
// Pool Handles
// ============================================================================

/// Handle to the supervisor task.
#[derive(Debug)]
pub struct PoolHandle {
    supervisor: JoinHandle<PoolSummary>,
}

impl PoolHandle {
    /// Waits until every worker has stopped and both output queues are closed.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Supervisor`] if the supervisor task was aborted.
    pub async fn join(self) -> Result<PoolSummary, PoolError> {
        self.supervisor
            .await
            .map_err(|e| PoolError::Supervisor(e.to_string()))
    }
}

/// The caller's side of a running pool.
///
/// Close `input` (drop it, or call [`Sender::close`]) after the last task;
/// `results` and `failures` close on their own once all workers are done.
#[derive(Debug)]
pub struct PoolChannels {
    /// Where tasks are submitted.
    pub input: Sender<Task>,
    /// Successful counts.
    pub results: Receiver<CountResult>,
    /// Failed tasks.
    pub failures: Receiver<TaskFailure>,
    /// Supervisor handle.
    pub handle: PoolHandle,
}

impl PoolChannels {
    /// Replaces the two output queues with a single merged stream.
    pub fn into_outcomes(self) -> (Sender<Task>, FanIn<Outcome>, PoolHandle) {
        let outcomes = merge_outcomes(self.results, self.failures);
        (self.input, outcomes, self.handle)
    }
}

// ============================================================================
// Worker Pool
// ============================================================================

/// A fixed-size pool of counting workers.
#[derive(Debug)]
pub struct WorkerPool {
    config: PoolConfig,
    processor: Arc<TaskProcessor>,
}

impl WorkerPool {
    /// Creates a pool after validating its config. Nothing runs until [`spawn`](Self::spawn).
    ///
    /// # Errors
    ///
    /// Returns a [`PoolError`] if the config is invalid.
    pub fn new(config: PoolConfig, ctx: FetchContext) -> Result<Self, PoolError> {
        config.validate()?;
        let processor = Arc::new(TaskProcessor::new(&config.target, ctx));
        Ok(Self { config, processor })
    }

    /// Starts every worker and the supervisor.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(self) -> PoolChannels {
        let capacity = self.config.queue_capacity;
        let (input_tx, input_rx) = async_channel::bounded::<Task>(capacity);
        let (results_tx, results_rx) = async_channel::bounded::<CountResult>(capacity);
        let (failures_tx, failures_rx) = async_channel::bounded::<TaskFailure>(capacity);

        info!(
            workers = self.config.workers,
            target = %self.config.target,
            "Starting worker pool"
        );

        let workers: Vec<JoinHandle<WorkerReport>> = (0..self.config.workers)
            .map(|id| {
                tokio::spawn(worker_loop(
                    id,
                    Arc::clone(&self.processor),
                    input_rx.clone(),
                    results_tx.clone(),
                    failures_tx.clone(),
                ))
            })
            .collect();

        // Workers own the only receivers from here on.
        drop(input_rx);

        let worker_count = workers.len();
        let supervisor = tokio::spawn(async move {
            let mut summary = PoolSummary {
                workers: worker_count,
                ..PoolSummary::default()
            };

            for joined in join_all(workers).await {
                match joined {
                    Ok(report) => {
                        summary.processed += report.processed;
                        summary.failed += report.failed;
                    }
                    Err(e) => {
                        warn!(error = %e, "Worker did not exit cleanly");
                        summary.panicked += 1;
                    }
                }
            }

            // Only place the output queues are ever closed.
            results_tx.close();
            failures_tx.close();

            info!(
                processed = summary.processed,
                failed = summary.failed,
                "Worker pool stopped"
            );
            summary
        });

        PoolChannels {
            input: input_tx,
            results: results_rx,
            failures: failures_rx,
            handle: PoolHandle { supervisor },
        }
    }
}

/// Creates and starts a pool counting `target` with `workers` workers.
///
/// # Errors
///
/// Returns a [`PoolError`] for an empty target or zero workers.
pub fn create_pool(
    target: &str,
    ctx: FetchContext,
    workers: usize,
) -> Result<PoolChannels, PoolError> {
    let config = PoolConfig::new(target).with_workers(workers);
    Ok(WorkerPool::new(config, ctx)?.spawn())
}

/// Runs one worker until the input queue is closed and empty.
async fn worker_loop(
    id: usize,
    processor: Arc<TaskProcessor>,
    input: Receiver<Task>,
    results: Sender<CountResult>,
    failures: Sender<TaskFailure>,
) -> WorkerReport {
    debug!(worker = id, "Worker started");
    let mut report = WorkerReport::default();

    while let Ok(task) = input.recv().await {
        debug!(worker = id, subject = %task.subject, "Task received");
        report.processed += 1;

        let delivered = match processor.process(&task).await {
            Ok(result) => results.send(result).await.is_ok(),
            Err(failure) => {
                report.failed += 1;
                failures.send(failure).await.is_ok()
            }
        };

        if !delivered {
            warn!(worker = id, subject = %task.subject, "Output queue has no receiver, stopping");
            break;
        }
    }

    debug!(worker = id, processed = report.processed, "Worker stopped");
    report
}

// ============================================================================
// Tests
// ============================================================================
