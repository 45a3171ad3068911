//! # Latency Ranker
//!
//! Measures one round trip per survivor, sorts ascending (stable, so equal
//! latencies keep discovery order) and keeps the first `required_count`.
//! Survivors that cannot be measured sort last with infinite latency.

use std::time::Duration;

use async_trait::async_trait;
use fronter_common::candidate::Candidate;
use futures::stream::{self, StreamExt};
use tracing::debug;

use crate::network::ping;

#[async_trait]
pub trait LatencyProbe: Send + Sync {
    /// Round-trip time in milliseconds, or `None` if it could not be measured.
    async fn measure(&self, candidate: &str) -> Option<f64>;
}

/// One ICMP echo through the system `ping`.
#[derive(Debug, Clone, Copy)]
pub struct PingLatency {
    pub wait: Duration,
}

impl PingLatency {
    pub fn new(wait: Duration) -> Self {
        Self { wait }
    }
}

#[async_trait]
impl LatencyProbe for PingLatency {
    async fn measure(&self, candidate: &str) -> Option<f64> {
        ping::latency_ms(candidate, self.wait).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ranked {
    pub candidate: Candidate,
    pub latency_ms: f64,
}

/// Measures every survivor (at most `concurrency` at a time) and returns
/// them sorted by latency, truncated to `required_count`.
pub async fn rank(
    survivors: Vec<Candidate>,
    probe: &dyn LatencyProbe,
    required_count: usize,
    concurrency: usize,
) -> Vec<Ranked> {
    let mut measured: Vec<Ranked> = stream::iter(survivors)
        .map(|candidate| async move {
            let latency_ms = probe.measure(&candidate).await.unwrap_or(f64::INFINITY);
            debug!(candidate = %candidate, latency_ms, "latency measured");
            Ranked {
                candidate,
                latency_ms,
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    measured.sort_by(|a, b| a.latency_ms.total_cmp(&b.latency_ms));
    measured.truncate(required_count);
    measured
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
