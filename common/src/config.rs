//! # Scan Configuration
//!
//! [`ScanConfig`] carries the per-job knobs (target count, overfetch, concurrency,
//! provider, TLS check) plus the per-stage [`Timeouts`].
//!
//! [`SourcesFile`] is the read-only view of the JSON document listing the
//! source-list URLs and static CIDR ranges. Editing that file is someone else's job.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::FronterError;
use crate::provider::{Provider, ScanCategory};

pub const DEFAULT_REQUIRED_COUNT: usize = 2;
pub const DEFAULT_OVERFETCH_FACTOR: f64 = 2.5;
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 20;
pub const DEFAULT_PROBE_PORT: u16 = 443;
pub const DEFAULT_RDAP_BASE: &str = "https://rdap.org";

/// Per-stage deadlines. There is no overall job deadline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeouts {
    /// Raw TCP reachability (address stage 0).
    pub connect: Duration,
    /// TCP re-check (address stage 3).
    pub port_recheck: Duration,
    /// One TLS handshake, with or without SNI.
    pub tls: Duration,
    /// Region-access HTTPS GET.
    pub http: Duration,
    /// Wait for a single echo reply.
    pub ping: Duration,
    /// RDAP lookup.
    pub registry: Duration,
    /// Downloading one source list.
    pub source_fetch: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(3),
            port_recheck: Duration::from_secs(2),
            tls: Duration::from_secs(3),
            http: Duration::from_secs(5),
            ping: Duration::from_secs(1),
            registry: Duration::from_secs(10),
            source_fetch: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Size of the final ranked output.
    pub required_count: usize,
    /// Passing candidates to accumulate per required slot before stopping early.
    pub overfetch_factor: f64,
    /// Maximum number of pipelines in flight.
    pub concurrency_limit: usize,
    /// `None` selects the domain pipeline.
    pub provider: Option<Provider>,
    pub use_tls_check: bool,
    pub probe_port: u16,
    pub rdap_base: String,
    pub timeouts: Timeouts,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            required_count: DEFAULT_REQUIRED_COUNT,
            overfetch_factor: DEFAULT_OVERFETCH_FACTOR,
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            provider: None,
            use_tls_check: true,
            probe_port: DEFAULT_PROBE_PORT,
            rdap_base: DEFAULT_RDAP_BASE.to_string(),
            timeouts: Timeouts::default(),
        }
    }
}

impl ScanConfig {
    pub fn for_category(category: ScanCategory) -> Self {
        Self {
            provider: category.provider(),
            ..Self::default()
        }
    }

    pub fn category(&self) -> ScanCategory {
        ScanCategory::from(self.provider)
    }

    pub fn with_required_count(mut self, required_count: usize) -> Self {
        self.required_count = required_count;
        self
    }

    pub fn with_overfetch_factor(mut self, overfetch_factor: f64) -> Self {
        self.overfetch_factor = overfetch_factor;
        self
    }

    pub fn with_concurrency_limit(mut self, concurrency_limit: usize) -> Self {
        self.concurrency_limit = concurrency_limit;
        self
    }

    pub fn with_tls_check(mut self, use_tls_check: bool) -> Self {
        self.use_tls_check = use_tls_check;
        self
    }

    pub fn validate(&self) -> Result<(), FronterError> {
        if self.required_count == 0 {
            return Err(FronterError::InvalidRequiredCount);
        }
        if !(self.overfetch_factor > 1.0) || !self.overfetch_factor.is_finite() {
            return Err(FronterError::InvalidOverfetch(self.overfetch_factor));
        }
        if self.concurrency_limit == 0 {
            return Err(FronterError::InvalidConcurrency);
        }
        Ok(())
    }

    /// Number of passing candidates after which scheduling stops.
    pub fn stop_after(&self) -> usize {
        (self.required_count as f64 * self.overfetch_factor).ceil() as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSource {
    pub url: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpSource {
    pub url: String,
    pub provider: Provider,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

/// Source lists and static ranges, as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesFile {
    pub domain_sources: Vec<DomainSource>,
    pub ip_sources: Vec<IpSource>,
    pub ranges: BTreeMap<Provider, Vec<String>>,
}

impl SourcesFile {
    /// Reads the file at `path`. A missing file is an empty configuration.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("sources file {} not found, using empty configuration", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading sources file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing sources file {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self, FronterError> {
        serde_json::from_str(raw).map_err(|e| FronterError::Config(e.to_string()))
    }

    /// Enabled source URLs feeding the given category.
    pub fn urls_for(&self, category: ScanCategory) -> Vec<String> {
        match category.provider() {
            None => self
                .domain_sources
                .iter()
                .filter(|s| s.enabled)
                .map(|s| s.url.clone())
                .collect(),
            Some(provider) => self
                .ip_sources
                .iter()
                .filter(|s| s.enabled && s.provider == provider)
                .map(|s| s.url.clone())
                .collect(),
        }
    }

    /// Static CIDR ranges for the given category. Domain mode has none.
    pub fn ranges_for(&self, category: ScanCategory) -> Vec<String> {
        category
            .provider()
            .and_then(|p| self.ranges.get(&p).cloned())
            .unwrap_or_default()
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
