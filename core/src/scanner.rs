//! The central **abstraction** for candidate validation.
//!
//! A [`Validator`] turns one candidate into a [`ValidationOutcome`]. The two
//! concrete pipelines, [`domain::DomainPipeline`] and
//! [`address::AddressPipeline`], are each an ordered list of [`Stage`]s run
//! strictly one after another, stopping at the first failure.
//!
//! High-level modules (the collector, the engine) depend on this trait only,
//! so any pipeline, or a test stub, can be plugged in.

use std::sync::Arc;

use async_trait::async_trait;
use fronter_common::candidate::{Stage, ValidationOutcome};
use fronter_common::config::ScanConfig;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::prober::Prober;

pub mod address;
pub mod domain;

pub use address::AddressPipeline;
pub use domain::DomainPipeline;

/// Runs one candidate through a validation pipeline.
///
/// Implementations must never panic on bad input and never return early
/// with an error: every failure is an outcome. `stop` is checked before each
/// stage; once it fires the candidate fails with [`Stage::Cancelled`].
#[async_trait]
pub trait Validator: Send + Sync {
    async fn validate(&self, candidate: &str, stop: &CancellationToken) -> ValidationOutcome;
}

/// One step of a staged pipeline.
#[async_trait]
pub(crate) trait StageCheck: Send + Sync {
    async fn check(&self, stage: Stage, candidate: &str) -> bool;
}

/// Runs `stages` in order, short-circuiting on the first failing stage or on `stop`.
pub(crate) async fn run_stages<P>(
    pipeline: &P,
    stages: &[Stage],
    candidate: &str,
    stop: &CancellationToken,
) -> ValidationOutcome
where
    P: StageCheck + ?Sized,
{
    for &stage in stages {
        if stop.is_cancelled() {
            return ValidationOutcome::fail(candidate, Stage::Cancelled);
        }
        if !pipeline.check(stage, candidate).await {
            debug!(candidate, %stage, "rejected");
            return ValidationOutcome::fail(candidate, stage);
        }
        trace!(candidate, %stage, "stage passed");
    }
    ValidationOutcome::pass(candidate)
}

/// Picks the pipeline matching the configured provider.
pub fn pipeline_for(cfg: &ScanConfig, prober: Arc<dyn Prober>) -> Arc<dyn Validator> {
    match cfg.provider {
        None => Arc::new(DomainPipeline::new(prober)),
        Some(provider) => Arc::new(AddressPipeline::new(
            prober,
            provider,
            cfg.probe_port,
            cfg.use_tls_check,
        )),
    }
}
