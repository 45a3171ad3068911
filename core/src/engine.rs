//! # Engine
//!
//! Ties the pieces together: a job builds its pool, validates it through the
//! early-stop collector, ranks the survivors by latency and publishes the
//! top `required_count` on its job slot.
//!
//! Manual mode skips the job slot, early stop and ranking: every candidate
//! is validated and all passes are returned in completion order.

use std::future::Future;
use std::sync::Arc;

use fronter_common::FronterError;
use fronter_common::candidate::Candidate;
use fronter_common::config::ScanConfig;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info, info_span};

use crate::collector::Collector;
use crate::job::{JobBoard, JobDriver};
use crate::ranker::{LatencyProbe, rank};
use crate::scanner::Validator;

/// Runs one job to completion on the current task and returns its ranked output.
///
/// An empty pool completes immediately with no output. The driver is
/// consumed, so the slot is always `Completed` afterwards.
pub async fn run_job(
    pool: Vec<Candidate>,
    cfg: &ScanConfig,
    validator: Arc<dyn Validator>,
    latency: &dyn LatencyProbe,
    mut driver: JobDriver,
) -> Vec<Candidate> {
    let cancel = driver.cancel_token();

    if pool.is_empty() {
        info!("Candidate pool is empty. Nothing to scan.");
        driver.finish(Vec::new());
        return Vec::new();
    }

    let stop_after = cfg.stop_after();
    info!(
        "Scanning {} candidates, stopping after {stop_after} clean results",
        pool.len()
    );
    let collector = Collector::new(validator, cfg.concurrency_limit, Some(stop_after));
    let survivors = collector.collect(pool, &mut driver, &cancel).await;
    info!("{} candidates passed validation", survivors.len());

    let ranked = rank(survivors, latency, cfg.required_count, cfg.concurrency_limit).await;
    let output: Vec<Candidate> = ranked.into_iter().map(|r| r.candidate).collect();

    driver.finish(output.clone());
    output
}

/// Starts a job for `cfg`'s category in the background.
///
/// `build_pool` receives the job's cancellation token so slow source
/// fetching can be interrupted; if it fires before the pool is ready the
/// job completes with no output. Invalid configuration and a category that
/// is already running are refused before anything is spawned.
pub fn start_job<F, Fut>(
    board: &JobBoard,
    cfg: ScanConfig,
    validator: Arc<dyn Validator>,
    latency: Arc<dyn LatencyProbe>,
    build_pool: F,
) -> Result<JoinHandle<Vec<Candidate>>, FronterError>
where
    F: FnOnce(CancellationToken) -> Fut + Send + 'static,
    Fut: Future<Output = Vec<Candidate>> + Send + 'static,
{
    cfg.validate()?;
    let category = cfg.category();
    let driver = board.start(category)?;
    let cancel = driver.cancel_token();

    let job = async move {
        let pool = build_pool(cancel.clone()).await;
        if cancel.is_cancelled() {
            info!("Cancelled while building the candidate pool");
            driver.finish(Vec::new());
            return Vec::new();
        }
        run_job(pool, &cfg, validator, latency.as_ref(), driver).await
    };

    Ok(tokio::spawn(job.instrument(info_span!("job", %category))))
}

/// Validates every candidate and returns the passes in completion order.
pub async fn validate_manual(
    candidates: Vec<Candidate>,
    cfg: &ScanConfig,
    validator: Arc<dyn Validator>,
    cancel: &CancellationToken,
) -> Result<Vec<Candidate>, FronterError> {
    if candidates.is_empty() {
        return Err(FronterError::EmptyCandidates);
    }
    cfg.validate()?;

    let collector = Collector::new(validator, cfg.concurrency_limit, None);
    Ok(collector.collect(candidates, &mut (), cancel).await)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
