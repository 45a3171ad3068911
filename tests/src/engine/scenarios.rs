use std::sync::Arc;
use std::time::Duration;

use fronter_common::FronterError;
use fronter_common::config::ScanConfig;
use fronter_common::job::JobState;
use fronter_common::provider::ScanCategory;
use fronter_core::engine::{self, validate_manual};
use fronter_core::job::JobBoard;
use fronter_core::pool::CandidatePool;
use fronter_core::prober::NetProber;
use fronter_core::ranker::PingLatency;
use fronter_core::scanner;
use tokio_util::sync::CancellationToken;

use crate::support::{
    StubLatency, StubValidator, closed_port, domain_config, pool, record_progress, spawn_job,
};

/// A:50, B:10, C:30, keep 2.
#[tokio::test]
async fn lowest_latency_pair_is_kept() {
    let board = JobBoard::new();
    let validator = Arc::new(StubValidator::new());
    let latency = StubLatency::new(&[("A", 50.0), ("B", 10.0), ("C", 30.0)]);

    let output = spawn_job(&board, domain_config(), validator, latency, pool(&["A", "B", "C"]))
        .await
        .unwrap();

    assert_eq!(output, vec!["B", "C"]);
    assert_eq!(board.progress(ScanCategory::Reality).output, output);
}

/// Five candidates, keep 1 with overfetch 2: scheduling stops after two passes.
#[tokio::test]
async fn early_stop_after_two_passes() {
    let board = JobBoard::new();
    let validator = Arc::new(StubValidator::new());
    let latency = StubLatency::new(&[("a", 40.0), ("b", 20.0), ("c", 1.0), ("d", 1.0), ("e", 1.0)]);
    let cfg = domain_config()
        .with_required_count(1)
        .with_overfetch_factor(2.0)
        .with_concurrency_limit(1);

    let output = spawn_job(&board, cfg, validator.clone(), latency, pool(&["a", "b", "c", "d", "e"]))
        .await
        .unwrap();

    assert_eq!(validator.started(), vec!["a", "b"]);
    assert_eq!(output, vec!["b"]);
    let snapshot = board.progress(ScanCategory::Reality);
    assert_eq!(snapshot.results, vec!["a", "b"]);
    assert_eq!((snapshot.done, snapshot.total), (2, 5));
}

/// Cancel as soon as the first of five probes has completed.
#[tokio::test]
async fn cancel_after_first_completion() {
    let board = JobBoard::new();
    let slow = Duration::from_secs(30);
    let validator = Arc::new(
        StubValidator::new()
            .delay("b", slow)
            .delay("c", slow)
            .delay("d", slow)
            .delay("e", slow),
    );
    let cfg = domain_config().with_concurrency_limit(1);
    let mut rx = board.subscribe(ScanCategory::Reality);

    let job = spawn_job(&board, cfg, validator.clone(), StubLatency::new(&[]), pool(&["a", "b", "c", "d", "e"]));
    rx.wait_for(|p| p.done >= 1).await.unwrap();
    board.cancel(ScanCategory::Reality).unwrap();

    let output = tokio::time::timeout(Duration::from_secs(5), job)
        .await
        .expect("job must finish promptly once cancelled")
        .unwrap();

    let snapshot = board.progress(ScanCategory::Reality);
    assert_eq!(snapshot.state, JobState::Completed);
    assert!(!snapshot.running());
    assert!(snapshot.cancel_requested);
    assert!(snapshot.done >= 1);
    assert_eq!(snapshot.results, vec!["a"]);
    assert_eq!(output, vec!["a"]);
}

/// A malformed range is skipped, the valid ones are still expanded and probed.
#[tokio::test]
async fn malformed_range_is_skipped() {
    let mut builder = CandidatePool::new();
    builder.add_ranges(["999.999.0.0/16", "10.1.0.0/30", "10.2.0.9/32"]);
    assert_eq!(builder.skipped_ranges(), 1);

    let board = JobBoard::new();
    let validator = Arc::new(StubValidator::new());
    let cfg = domain_config().with_required_count(5);

    let output = spawn_job(&board, cfg, validator.clone(), StubLatency::new(&[]), builder.into_vec())
        .await
        .unwrap();

    let mut started = validator.started();
    started.sort();
    assert_eq!(
        started,
        vec!["10.1.0.0", "10.1.0.1", "10.1.0.2", "10.1.0.3", "10.2.0.9"]
    );
    assert_eq!(output.len(), 5);
}

/// Every address is unreachable: the job still completes, empty.
#[tokio::test]
async fn all_candidates_fail_stage_zero() {
    let mut cfg = ScanConfig::for_category(ScanCategory::Cloudflare).with_tls_check(false);
    cfg.probe_port = closed_port().await;
    cfg.rdap_base = format!("http://127.0.0.1:{}", closed_port().await);
    let validator = scanner::pipeline_for(&cfg, Arc::new(NetProber::new(&cfg).unwrap()));
    let latency = Arc::new(PingLatency::new(cfg.timeouts.ping));

    let board = JobBoard::new();
    let progress = record_progress(board.subscribe(ScanCategory::Cloudflare));
    let job = engine::start_job(&board, cfg, validator, latency, |_| async {
        pool(&["127.0.0.1", "127.0.0.2", "127.0.0.1", "127.0.0.3"])
    })
    .unwrap();

    let output = job.await.unwrap();
    let history = progress.await.unwrap();
    let last = history.last().unwrap();

    assert!(output.is_empty());
    assert!(last.results.is_empty());
    assert!(last.is_completed());
    assert_eq!(last.done, last.total);
    assert_eq!(last.total, 3);
}

/// Manual mode with nothing to check is a usage error, raised before any probe.
#[tokio::test]
async fn manual_mode_with_no_candidates_is_rejected() {
    let validator = Arc::new(StubValidator::new());

    let result = validate_manual(Vec::new(), &domain_config(), validator.clone(), &CancellationToken::new()).await;

    assert_eq!(result, Err(FronterError::EmptyCandidates));
    assert!(validator.started().is_empty());
}
