//! # Early-Stop Collector
//!
//! Schedules one validation task per candidate under a counting semaphore,
//! consumes completions in the order they finish and stops admitting work
//! once enough candidates have passed or cancellation was requested.
//!
//! Scheduling is lazy: a task is only spawned after it has won an admission
//! permit, so nothing past the stop point is ever admitted. Tasks already in
//! flight when the collector stops are told to stop, aborted, and whatever
//! they still deliver is dropped.

use std::collections::HashSet;
use std::sync::Arc;

use fronter_common::candidate::{Candidate, ValidationOutcome};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, trace, warn};

use crate::scanner::Validator;

/// Receives live progress from the collector.
pub trait ProgressSink: Send {
    /// Pool size after deduplication. Called once, before any probe runs.
    fn set_total(&mut self, total: usize);

    /// One probe finished. `passed` holds the candidate if it passed.
    fn completed(&mut self, passed: Option<&Candidate>);
}

/// Sink for callers that do not track progress.
impl ProgressSink for () {
    fn set_total(&mut self, _total: usize) {}

    fn completed(&mut self, _passed: Option<&Candidate>) {}
}

pub struct Collector {
    validator: Arc<dyn Validator>,
    concurrency: usize,
    stop_after: Option<usize>,
}

impl Collector {
    /// `stop_after = None` runs the whole pool.
    pub fn new(validator: Arc<dyn Validator>, concurrency: usize, stop_after: Option<usize>) -> Self {
        Self {
            validator,
            concurrency: concurrency.max(1),
            stop_after,
        }
    }

    fn has_enough(&self, accepted: usize) -> bool {
        self.stop_after.is_some_and(|target| accepted >= target)
    }

    /// Validates `pool` and returns the passing candidates in completion order.
    ///
    /// Never fails: panicking probes count as failed candidates and
    /// cancellation returns what has been accepted so far.
    pub async fn collect(
        &self,
        pool: Vec<Candidate>,
        sink: &mut dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Vec<Candidate> {
        let pool = dedup_in_order(pool);
        sink.set_total(pool.len());

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let stop = cancel.child_token();
        let mut pending = pool.into_iter().peekable();
        // The permit travels back with the outcome, so a slot is only freed
        // once its result has been consumed here.
        let mut in_flight: JoinSet<(ValidationOutcome, OwnedSemaphorePermit)> = JoinSet::new();
        let mut accepted: Vec<Candidate> = Vec::new();

        loop {
            if cancel.is_cancelled() {
                info!("Cancel requested. Stopping early...");
                break;
            }
            if self.has_enough(accepted.len()) {
                info!("Enough clean candidates found. Stopping early.");
                break;
            }

            let has_pending = pending.peek().is_some();
            if !has_pending && in_flight.is_empty() {
                break;
            }

            tokio::select! {
                biased;

                _ = cancel.cancelled() => {}

                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    match joined {
                        Ok((outcome, _permit)) if outcome.passed() => {
                            sink.completed(Some(&outcome.candidate));
                            accepted.push(outcome.candidate);
                        }
                        Ok((outcome, _permit)) => {
                            trace!(candidate = %outcome.candidate, stage = ?outcome.failed_at, "failed");
                            sink.completed(None);
                        }
                        Err(e) => {
                            warn!("probe task ended abnormally: {e}");
                            sink.completed(None);
                        }
                    }
                }

                permit = semaphore.clone().acquire_owned(), if has_pending => {
                    let Ok(permit) = permit else {
                        break;
                    };
                    let Some(candidate) = pending.next() else {
                        continue;
                    };
                    let validator = self.validator.clone();
                    let stop = stop.clone();
                    in_flight.spawn(
                        async move {
                            let outcome = validator.validate(&candidate, &stop).await;
                            (outcome, permit)
                        }
                        .in_current_span(),
                    );
                }
            }
        }

        stop.cancel();
        let outstanding = in_flight.len();
        in_flight.abort_all();
        while let Some(late) = in_flight.join_next().await {
            if let Ok((outcome, _)) = late {
                trace!(candidate = %outcome.candidate, "discarding late result");
            }
        }
        if outstanding > 0 {
            debug!(outstanding, "outstanding probes cancelled");
        }

        accepted
    }
}

/// Removes repeated candidates, keeping the first occurrence.
fn dedup_in_order(pool: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen: HashSet<Candidate> = HashSet::with_capacity(pool.len());
    pool.into_iter()
        .filter(|c| seen.insert(c.clone()))
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
