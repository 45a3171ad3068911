use std::sync::Arc;

use anyhow::Context;
use fronter_common::candidate::Candidate;
use fronter_common::config::ScanConfig;
use fronter_core::engine;
use fronter_core::prober::NetProber;
use fronter_core::scanner;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::terminal::print;

/// Manual mode: validates `items` and lists every pass, no ranking.
pub async fn check(cfg: ScanConfig, items: Vec<Candidate>) -> anyhow::Result<()> {
    let prober = NetProber::new(&cfg).context("building the HTTP client")?;
    let validator = scanner::pipeline_for(&cfg, Arc::new(prober));

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Cancel requested. Stopping early...");
            on_interrupt.cancel();
        }
    });

    info!("Checking {} candidates as {}", items.len(), cfg.category());
    let passed = engine::validate_manual(items, &cfg, validator, &cancel).await;
    watcher.abort();
    let passed = passed?;

    print::header("clean candidates", 0);
    if passed.is_empty() {
        print::no_results();
    }
    for (idx, candidate) in passed.iter().enumerate() {
        print::tree_head(idx + 1, candidate);
    }
    Ok(())
}
