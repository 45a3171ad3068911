use std::fmt;

/// A domain name or IPv4 literal under evaluation.
pub type Candidate = String;

/// A single check inside a validation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Domain: TLS handshake on port 443 yields a peer certificate.
    TlsReachability,
    /// Domain: HTTPS GET from this host answers 200.
    RegionAccess,
    /// Address: TCP connect to the probe port.
    RawReachability,
    /// Address: registry record names the expected provider.
    Ownership,
    /// Address: one ICMP echo is answered.
    Liveness,
    /// Address: TCP port re-check.
    PortCheck,
    /// Address: TLS handshake with one of the provider's SNI hosts.
    TlsSni,
    /// The pipeline stopped because the job was told to stop.
    Cancelled,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::TlsReachability => "tls reachability",
            Stage::RegionAccess => "region access",
            Stage::RawReachability => "raw reachability",
            Stage::Ownership => "ownership",
            Stage::Liveness => "liveness",
            Stage::PortCheck => "port check",
            Stage::TlsSni => "tls sni",
            Stage::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Result of running one candidate through a pipeline. Always a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub candidate: Candidate,
    pub failed_at: Option<Stage>,
}

impl ValidationOutcome {
    pub fn pass(candidate: impl Into<Candidate>) -> Self {
        Self {
            candidate: candidate.into(),
            failed_at: None,
        }
    }

    pub fn fail(candidate: impl Into<Candidate>, stage: Stage) -> Self {
        Self {
            candidate: candidate.into(),
            failed_at: Some(stage),
        }
    }

    pub fn passed(&self) -> bool {
        self.failed_at.is_none()
    }
}
