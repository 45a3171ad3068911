//! Validation pipeline for **domain** candidates.
//!
//! 1. TLS reachability: a verified handshake on port 443, using the domain
//!    itself as SNI, must yield a peer certificate.
//! 2. Region access: `GET https://{domain}` must end in `200 OK`.
//!
//! The region check runs from this machine's network location. It only means
//! "not blocked" if the process runs inside the region of interest.

use std::sync::Arc;

use async_trait::async_trait;
use fronter_common::candidate::{Stage, ValidationOutcome};
use tokio_util::sync::CancellationToken;
use tracing::{debug_span, info, Instrument};

use super::{StageCheck, Validator, run_stages};
use crate::prober::Prober;

const STAGES: [Stage; 2] = [Stage::TlsReachability, Stage::RegionAccess];

pub struct DomainPipeline {
    prober: Arc<dyn Prober>,
}

impl DomainPipeline {
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self { prober }
    }
}

#[async_trait]
impl StageCheck for DomainPipeline {
    async fn check(&self, stage: Stage, domain: &str) -> bool {
        match stage {
            Stage::TlsReachability => self.prober.tls_handshake(domain, domain).await,
            Stage::RegionAccess => self.prober.https_ok(domain).await,
            _ => false,
        }
    }
}

#[async_trait]
impl Validator for DomainPipeline {
    async fn validate(&self, candidate: &str, stop: &CancellationToken) -> ValidationOutcome {
        let span = debug_span!("validate", candidate);
        let outcome = run_stages(self, &STAGES, candidate, stop).instrument(span).await;
        if outcome.passed() {
            info!("Domain {candidate} is alive and accessible");
        }
        outcome
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
