//! # Job Board
//!
//! One progress slot per [`ScanCategory`]. Each slot is a `watch` channel:
//! the running job's [`JobDriver`] is its only writer, pollers read
//! consistent snapshots and never hold a reference into live state.
//!
//! Start is a single check-and-set on the slot, so two concurrent starts of
//! the same category cannot both succeed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use fronter_common::FronterError;
use fronter_common::candidate::Candidate;
use fronter_common::job::{JobProgress, JobState};
use fronter_common::provider::ScanCategory;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::collector::ProgressSink;

struct Slot {
    progress: watch::Sender<JobProgress>,
    cancel: Mutex<CancellationToken>,
}

impl Slot {
    fn new() -> Self {
        let (progress, _) = watch::channel(JobProgress::default());
        Self {
            progress,
            cancel: Mutex::new(CancellationToken::new()),
        }
    }

    fn replace_token(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let mut guard = self.cancel.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = token.clone();
        token
    }

    fn cancel_token(&self) {
        self.cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
    }
}

pub struct JobBoard {
    slots: HashMap<ScanCategory, Arc<Slot>>,
}

impl Default for JobBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl JobBoard {
    pub fn new() -> Self {
        let slots = ScanCategory::ALL
            .into_iter()
            .map(|category| (category, Arc::new(Slot::new())))
            .collect();
        Self { slots }
    }

    fn slot(&self, category: ScanCategory) -> &Arc<Slot> {
        // Every category gets a slot in `new`.
        &self.slots[&category]
    }

    /// Resets the slot and marks it running. The returned driver is the
    /// slot's only writer until it is dropped.
    pub fn start(&self, category: ScanCategory) -> Result<JobDriver, FronterError> {
        let slot = self.slot(category);
        let mut token = None;

        slot.progress.send_if_modified(|progress| {
            if progress.running() {
                return false;
            }
            *progress = JobProgress {
                state: JobState::Running,
                ..JobProgress::default()
            };
            token = Some(slot.replace_token());
            true
        });

        let Some(cancel) = token else {
            return Err(FronterError::AlreadyRunning(category));
        };
        info!("Starting {category} scan");
        Ok(JobDriver {
            category,
            slot: slot.clone(),
            cancel,
        })
    }

    /// Requests cancellation of the running job.
    pub fn cancel(&self, category: ScanCategory) -> Result<(), FronterError> {
        let slot = self.slot(category);
        let mut was_running = false;

        slot.progress.send_if_modified(|progress| {
            if !progress.running() {
                return false;
            }
            was_running = true;
            slot.cancel_token();
            let changed = !progress.cancel_requested;
            progress.cancel_requested = true;
            changed
        });

        if was_running {
            info!("Cancel requested for {category} scan");
            Ok(())
        } else {
            Err(FronterError::NotRunning(category))
        }
    }

    pub fn progress(&self, category: ScanCategory) -> JobProgress {
        self.slot(category).progress.borrow().clone()
    }

    pub fn subscribe(&self, category: ScanCategory) -> watch::Receiver<JobProgress> {
        self.slot(category).progress.subscribe()
    }
}

/// Write handle for one running job.
///
/// Dropping the driver marks the job `Completed`, whether it finished,
/// was cancelled, or panicked.
pub struct JobDriver {
    category: ScanCategory,
    slot: Arc<Slot>,
    cancel: CancellationToken,
}

impl JobDriver {
    pub fn category(&self) -> ScanCategory {
        self.category
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Publishes the ranked output and completes the job.
    pub fn finish(self, output: Vec<Candidate>) {
        self.slot.progress.send_modify(|progress| progress.output = output);
    }
}

impl ProgressSink for JobDriver {
    fn set_total(&mut self, total: usize) {
        self.slot.progress.send_modify(|progress| progress.total = total);
    }

    fn completed(&mut self, passed: Option<&Candidate>) {
        self.slot.progress.send_modify(|progress| {
            progress.done = (progress.done + 1).min(progress.total);
            if let Some(candidate) = passed {
                progress.results.push(candidate.clone());
            }
        });
    }
}

impl Drop for JobDriver {
    fn drop(&mut self) {
        self.slot.progress.send_if_modified(|progress| {
            if progress.state != JobState::Running {
                return false;
            }
            progress.state = JobState::Completed;
            true
        });
        debug!(category = %self.category, "job slot released");
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
