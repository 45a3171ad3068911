//! Real pipelines against loopback listeners and a local RDAP endpoint.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use fronter_common::candidate::Stage;
use fronter_common::config::ScanConfig;
use fronter_common::provider::ScanCategory;
use fronter_core::prober::NetProber;
use fronter_core::scanner::{self, Validator};
use tokio_util::sync::CancellationToken;

use crate::support::{closed_port, open_port, rdap_server};

const CLOUDFLARE_RECORD: &str = r#"{
    "objectClassName": "ip network",
    "handle": "NET-104-16-0-0-1",
    "name": "CLOUDFLARENET",
    "entities": [{"vcardArray": ["vcard", [["version", {}, "text", "4.0"], ["fn", {}, "text", "Cloudflare, Inc."]]]}]
}"#;

const OTHER_RECORD: &str = r#"{
    "handle": "NET-127-0-0-0-1",
    "name": "LOOPBACK",
    "remarks": [{"title": "Registration", "description": ["Some Regional ISP"]}]
}"#;

fn address_config(port: u16, rdap_base: String) -> ScanConfig {
    let mut cfg = ScanConfig::for_category(ScanCategory::Cloudflare).with_tls_check(false);
    cfg.probe_port = port;
    cfg.rdap_base = rdap_base;
    cfg
}

fn validator(cfg: &ScanConfig) -> Arc<dyn Validator> {
    scanner::pipeline_for(cfg, Arc::new(NetProber::new(cfg).unwrap()))
}

#[tokio::test]
async fn closed_port_fails_before_any_registry_lookup() {
    let (rdap, hits) = rdap_server(CLOUDFLARE_RECORD).await;
    let cfg = address_config(closed_port().await, rdap);

    let outcome = validator(&cfg).validate("127.0.0.1", &CancellationToken::new()).await;

    assert_eq!(outcome.failed_at, Some(Stage::RawReachability));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn foreign_owner_fails_ownership() {
    let (rdap, hits) = rdap_server(OTHER_RECORD).await;
    let cfg = address_config(open_port().await, rdap);

    let outcome = validator(&cfg).validate("127.0.0.1", &CancellationToken::new()).await;

    assert_eq!(outcome.failed_at, Some(Stage::Ownership));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn matching_owner_moves_past_ownership() {
    let (rdap, _) = rdap_server(CLOUDFLARE_RECORD).await;
    let cfg = address_config(open_port().await, rdap);

    let outcome = validator(&cfg).validate("127.0.0.1", &CancellationToken::new()).await;

    // Liveness depends on a `ping` binary being available here.
    assert!(
        matches!(outcome.failed_at, None | Some(Stage::Liveness)),
        "unexpected outcome {outcome:?}"
    );
}

#[tokio::test]
async fn plain_tcp_listener_fails_domain_tls_reachability() {
    let mut cfg = ScanConfig::for_category(ScanCategory::Reality);
    cfg.probe_port = open_port().await;

    let outcome = validator(&cfg).validate("localhost", &CancellationToken::new()).await;

    assert_eq!(outcome.failed_at, Some(Stage::TlsReachability));
}

#[tokio::test]
async fn stopped_token_cancels_before_the_first_stage() {
    let (rdap, hits) = rdap_server(CLOUDFLARE_RECORD).await;
    let cfg = address_config(open_port().await, rdap);
    let stop = CancellationToken::new();
    stop.cancel();

    let outcome = validator(&cfg).validate("127.0.0.1", &stop).await;

    assert_eq!(outcome.failed_at, Some(Stage::Cancelled));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}
