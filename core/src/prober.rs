//! The probing **seam** between validation pipelines and the network.
//!
//! Pipelines only ever talk to a [`Prober`]. The production implementation,
//! [`NetProber`], maps each question onto the primitives in
//! [`crate::network`]; tests substitute deterministic stubs.

use std::net::Ipv4Addr;

use async_trait::async_trait;
use fronter_common::config::{ScanConfig, Timeouts};
use reqwest::Client;

use crate::network::{http, ping, rdap, tcp, tls};

/// Every question a validation pipeline may ask about a host.
///
/// Implementations never fail: a probe that cannot be carried out answers
/// negatively.
#[async_trait]
pub trait Prober: Send + Sync {
    /// TCP connect to `host:port`. `recheck` selects the shorter re-check deadline.
    async fn tcp_open(&self, host: &str, port: u16, recheck: bool) -> bool;

    /// Verified TLS handshake against `host:443` presenting `sni`.
    async fn tls_handshake(&self, host: &str, sni: &str) -> bool;

    /// `GET https://{host}` answers 200 after redirects.
    async fn https_ok(&self, host: &str) -> bool;

    /// Registry record for `ip` mentions `fragment`.
    async fn ownership_matches(&self, ip: Ipv4Addr, fragment: &str) -> bool;

    /// One echo request is answered.
    async fn ping(&self, host: &str) -> bool;
}

/// Probes the real network from this machine.
#[derive(Debug, Clone)]
pub struct NetProber {
    client: Client,
    timeouts: Timeouts,
    tls_port: u16,
    rdap_base: String,
}

impl NetProber {
    pub fn new(cfg: &ScanConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: http::build_client()?,
            timeouts: cfg.timeouts,
            tls_port: cfg.probe_port,
            rdap_base: cfg.rdap_base.clone(),
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Prober for NetProber {
    async fn tcp_open(&self, host: &str, port: u16, recheck: bool) -> bool {
        let deadline = if recheck {
            self.timeouts.port_recheck
        } else {
            self.timeouts.connect
        };
        tcp::port_open(host, port, deadline).await
    }

    async fn tls_handshake(&self, host: &str, sni: &str) -> bool {
        tls::handshake(host, self.tls_port, sni, self.timeouts.tls).await
    }

    async fn https_ok(&self, host: &str) -> bool {
        http::https_ok(&self.client, host, self.timeouts.http).await
    }

    async fn ownership_matches(&self, ip: Ipv4Addr, fragment: &str) -> bool {
        rdap::ownership_matches(&self.client, &self.rdap_base, ip, fragment, self.timeouts.registry)
            .await
    }

    async fn ping(&self, host: &str) -> bool {
        ping::is_alive(host, self.timeouts.ping).await
    }
}
