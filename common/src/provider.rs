//! # Providers and Scan Categories
//!
//! A [`Provider`] is a CDN-like network whose address ownership we verify.
//! Each provider has an immutable [`ProviderProfile`] describing how to
//! recognise it: the hostnames used as SNI during the TLS probe and the name
//! fragment looked for in registry records.
//!
//! A [`ScanCategory`] names one independent job slot. `Reality` scans domain
//! names; the provider categories scan IPv4 addresses.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Fastly,
    Cloudflare,
}

/// Static verification data for a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    /// Hostnames tried as SNI, in order, during the TLS-SNI stage.
    pub sni_hosts: Vec<&'static str>,
    /// Lowercase fragment expected in the registry's network or AS name.
    pub ownership_fragment: &'static str,
}

const FASTLY_SNI_HOSTS: &[&str] = &[
    "github.com",
    "cdn.jsdelivr.net",
    "assets-cdn.github.com",
    "global.prod.fastly.net",
];

const CLOUDFLARE_SNI_HOSTS: &[&str] = &[
    "www.cloudflare.com",
    "www.cloudflarestatus.com",
    "www.cloudflareinsights.com",
    "1.1.1.1",
    "blog.cloudflare.com",
    "developers.cloudflare.com",
    "workers.cloudflare.com",
    "pages.dev",
    "cf.pages.dev",
    "status.cloudflare.com",
];

static PROFILES: LazyLock<HashMap<Provider, ProviderProfile>> = LazyLock::new(|| {
    HashMap::from([
        (
            Provider::Fastly,
            ProviderProfile {
                sni_hosts: FASTLY_SNI_HOSTS.to_vec(),
                ownership_fragment: "fastly",
            },
        ),
        (
            Provider::Cloudflare,
            ProviderProfile {
                sni_hosts: CLOUDFLARE_SNI_HOSTS.to_vec(),
                ownership_fragment: "cloudflare",
            },
        ),
    ])
});

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Fastly, Provider::Cloudflare];

    /// Returns the immutable profile for this provider.
    pub fn profile(self) -> &'static ProviderProfile {
        // Every variant is inserted when the table is built.
        &PROFILES[&self]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Fastly => "fastly",
            Provider::Cloudflare => "cloudflare",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fastly" => Ok(Provider::Fastly),
            "cloudflare" => Ok(Provider::Cloudflare),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}

/// One independent job slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanCategory {
    /// Domain names validated for TLS reachability and region access.
    Reality,
    Fastly,
    Cloudflare,
}

impl ScanCategory {
    pub const ALL: [ScanCategory; 3] = [
        ScanCategory::Reality,
        ScanCategory::Fastly,
        ScanCategory::Cloudflare,
    ];

    /// `None` means domain mode.
    pub fn provider(self) -> Option<Provider> {
        match self {
            ScanCategory::Reality => None,
            ScanCategory::Fastly => Some(Provider::Fastly),
            ScanCategory::Cloudflare => Some(Provider::Cloudflare),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScanCategory::Reality => "reality",
            ScanCategory::Fastly => "fastly",
            ScanCategory::Cloudflare => "cloudflare",
        }
    }
}

impl From<Option<Provider>> for ScanCategory {
    fn from(provider: Option<Provider>) -> Self {
        match provider {
            None => ScanCategory::Reality,
            Some(Provider::Fastly) => ScanCategory::Fastly,
            Some(Provider::Cloudflare) => ScanCategory::Cloudflare,
        }
    }
}

impl fmt::Display for ScanCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanCategory {
    type Err = String;

    /// Accepts `reality` (alias `domain`), `fastly` and `cloudflare`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reality" | "domain" => Ok(ScanCategory::Reality),
            other => other
                .parse::<Provider>()
                .map(|p| ScanCategory::from(Some(p)))
                .map_err(|_| format!("unknown scan category: {s}")),
        }
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
