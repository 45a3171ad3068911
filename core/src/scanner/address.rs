//! Validation pipeline for **IPv4 address** candidates of a named provider.
//!
//! Stages, in fixed order:
//!
//! 0. raw reachability (TCP connect to the probe port)
//! 1. ownership (RDAP record mentions the provider)
//! 2. liveness (one ICMP echo answered)
//! 3. port re-check
//! 4. TLS-SNI, only when enabled: the provider's verification hostnames are
//!    tried as SNI in listed order until one handshake yields a certificate.
//!
//! The registry lookup runs before the cheaper checks. That order is kept on
//! purpose; pass/fail results would be identical either way but the log and
//! timing profile would not.

use std::net::Ipv4Addr;
use std::sync::Arc;

use async_trait::async_trait;
use fronter_common::candidate::{Stage, ValidationOutcome};
use fronter_common::provider::{Provider, ProviderProfile};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, debug_span, info};

use super::{StageCheck, Validator, run_stages};
use crate::prober::Prober;

const STAGES: [Stage; 5] = [
    Stage::RawReachability,
    Stage::Ownership,
    Stage::Liveness,
    Stage::PortCheck,
    Stage::TlsSni,
];

pub struct AddressPipeline {
    prober: Arc<dyn Prober>,
    provider: Provider,
    profile: &'static ProviderProfile,
    port: u16,
    use_tls_check: bool,
}

impl AddressPipeline {
    pub fn new(prober: Arc<dyn Prober>, provider: Provider, port: u16, use_tls_check: bool) -> Self {
        Self {
            prober,
            provider,
            profile: provider.profile(),
            port,
            use_tls_check,
        }
    }

    fn stages(&self) -> &'static [Stage] {
        if self.use_tls_check {
            &STAGES
        } else {
            &STAGES[..STAGES.len() - 1]
        }
    }

    /// Tries each verification hostname in order, stopping at the first success.
    async fn sni_check(&self, ip: &str) -> bool {
        for sni in &self.profile.sni_hosts {
            if self.prober.tls_handshake(ip, sni).await {
                debug!(ip, sni, "TLS success");
                return true;
            }
            debug!(ip, sni, "TLS failed");
        }
        false
    }
}

#[async_trait]
impl StageCheck for AddressPipeline {
    async fn check(&self, stage: Stage, ip: &str) -> bool {
        match stage {
            Stage::RawReachability => self.prober.tcp_open(ip, self.port, false).await,
            Stage::Ownership => match ip.parse::<Ipv4Addr>() {
                Ok(addr) => {
                    self.prober
                        .ownership_matches(addr, self.profile.ownership_fragment)
                        .await
                }
                Err(_) => false,
            },
            Stage::Liveness => self.prober.ping(ip).await,
            Stage::PortCheck => self.prober.tcp_open(ip, self.port, true).await,
            Stage::TlsSni => self.sni_check(ip).await,
            _ => false,
        }
    }
}

#[async_trait]
impl Validator for AddressPipeline {
    async fn validate(&self, candidate: &str, stop: &CancellationToken) -> ValidationOutcome {
        if candidate.parse::<Ipv4Addr>().is_err() {
            debug!(candidate, "not an IPv4 address");
            return ValidationOutcome::fail(candidate, Stage::RawReachability);
        }

        let span = debug_span!("validate", candidate, provider = %self.provider);
        let outcome = run_stages(self, self.stages(), candidate, stop)
            .instrument(span)
            .await;
        if outcome.passed() {
            info!("{candidate} is clean and usable");
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
