use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::*;
use fronter_common::candidate::Candidate;
use fronter_common::config::{ScanConfig, SourcesFile};
use fronter_core::engine;
use fronter_core::job::JobBoard;
use fronter_core::pool::CandidatePool;
use fronter_core::prober::NetProber;
use fronter_core::ranker::PingLatency;
use fronter_core::scanner;
use fronter_core::sources::SourceFetcher;
use tracing::{info, warn};

use crate::terminal::{colors, print, progress};

pub async fn auto(cfg: ScanConfig, sources_path: &Path) -> anyhow::Result<()> {
    let category = cfg.category();
    let sources = SourcesFile::load(sources_path)
        .with_context(|| format!("loading {}", sources_path.display()))?;
    let urls = sources.urls_for(category);
    let ranges = sources.ranges_for(category);
    if urls.is_empty() && ranges.is_empty() {
        warn!("No enabled sources or ranges for {category} in {}", sources_path.display());
    }

    let prober = NetProber::new(&cfg).context("building the HTTP client")?;
    let fetcher = SourceFetcher::new(prober.client().clone(), cfg.timeouts.source_fetch);
    let validator = scanner::pipeline_for(&cfg, Arc::new(prober));
    let latency = Arc::new(PingLatency::new(cfg.timeouts.ping));

    let board = JobBoard::new();
    let mut job = engine::start_job(&board, cfg, validator, latency, move |cancel| async move {
        let fetched = fetcher.fetch_all(&urls, &cancel).await;
        let mut pool = CandidatePool::new();
        pool.add_ranges(&ranges).add_items(fetched);
        info!("Candidate pool holds {} unique entries", pool.len());
        pool.into_vec()
    })?;
    let tracker = tokio::spawn(progress::track(board.subscribe(category)));

    let output: Vec<Candidate> = tokio::select! {
        joined = &mut job => joined?,
        Ok(()) = tokio::signal::ctrl_c() => {
            if let Err(e) = board.cancel(category) {
                warn!("{e}");
            }
            job.await?
        }
    };
    let _ = tracker.await;

    report(&board.progress(category).results, &output);
    Ok(())
}

fn report(clean: &[Candidate], output: &[Candidate]) {
    print::header("results", 0);
    print::aligned_line("clean found", clean.len().to_string());
    print::aligned_line("kept", output.len().to_string());

    if output.is_empty() {
        print::no_results();
        return;
    }
    for (idx, candidate) in output.iter().enumerate() {
        print::tree_head(idx + 1, candidate);
    }
    print::centerln(&"ranked by measured latency, lowest first".italic().color(colors::SEPARATOR).to_string());
}
