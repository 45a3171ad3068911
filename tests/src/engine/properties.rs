use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use fronter_common::provider::ScanCategory;
use fronter_core::job::JobBoard;

use crate::support::{StubLatency, StubValidator, domain_config, pool, record_progress, spawn_job};

const POOL: [&str; 8] = ["p0", "p1", "p2", "p3", "p4", "p5", "p6", "p7"];
const LATENCIES: [(&str, f64); 8] = [
    ("p0", 42.0),
    ("p1", 7.5),
    ("p2", 19.0),
    ("p3", 88.0),
    ("p4", 3.25),
    ("p5", 19.0),
    ("p6", 61.0),
    ("p7", 12.0),
];

fn staggered_validator() -> StubValidator {
    StubValidator::new()
        .delay("p0", Duration::from_millis(30))
        .delay("p3", Duration::from_millis(15))
        .delay("p6", Duration::from_millis(25))
}

#[tokio::test]
async fn output_never_exceeds_required_count() {
    for k in 1..=POOL.len() + 2 {
        let board = JobBoard::new();
        let cfg = domain_config().with_required_count(k).with_concurrency_limit(3);

        let output = spawn_job(
            &board,
            cfg,
            Arc::new(StubValidator::new()),
            StubLatency::new(&LATENCIES),
            pool(&POOL),
        )
        .await
        .unwrap();

        assert!(output.len() <= k, "k={k} produced {}", output.len());
        assert_eq!(output.len(), k.min(POOL.len()));
    }
}

#[tokio::test]
async fn output_is_sorted_and_ties_keep_completion_order() {
    let board = JobBoard::new();
    let cfg = domain_config().with_required_count(3).with_concurrency_limit(1);
    let latency = StubLatency::new(&[("x", 10.0), ("y", 10.0), ("z", 5.0), ("w", 10.0)]);

    let output = spawn_job(&board, cfg, Arc::new(StubValidator::new()), latency, pool(&["x", "y", "z", "w"]))
        .await
        .unwrap();

    // Single slot: completion order equals pool order.
    assert_eq!(output, vec!["z", "x", "y"]);
}

#[tokio::test]
async fn output_is_unique_and_drawn_from_the_pool() {
    let board = JobBoard::new();
    let items = pool(&["p1", "p4", "p1", "p7", "p4", "p4", "p2"]);
    let cfg = domain_config().with_required_count(10);

    let output = spawn_job(&board, cfg, Arc::new(StubValidator::new()), StubLatency::new(&LATENCIES), items.clone())
        .await
        .unwrap();

    let unique: HashSet<&String> = output.iter().collect();
    assert_eq!(unique.len(), output.len());
    assert!(output.iter().all(|c| items.contains(c)));
    assert_eq!(output, vec!["p4", "p1", "p7", "p2"]);
}

#[tokio::test]
async fn done_is_monotonic_and_bounded_by_total() {
    let board = JobBoard::new();
    let progress = record_progress(board.subscribe(ScanCategory::Reality));
    let cfg = domain_config().with_required_count(8).with_concurrency_limit(2);

    spawn_job(&board, cfg, Arc::new(staggered_validator()), StubLatency::new(&LATENCIES), pool(&POOL))
        .await
        .unwrap();
    let history = progress.await.unwrap();

    assert!(history.len() > 1);
    for pair in history.windows(2) {
        assert!(pair[0].done <= pair[1].done);
    }
    for snapshot in &history {
        assert!(snapshot.done <= snapshot.total);
    }
    let last = history.last().unwrap();
    assert!(last.is_completed());
    assert_eq!(last.done, POOL.len());
}

#[tokio::test]
async fn failing_candidates_never_reach_results() {
    let board = JobBoard::new();
    let validator = Arc::new(staggered_validator().fail(&["p1", "p4", "p6"]));
    let cfg = domain_config().with_required_count(8).with_concurrency_limit(4);

    let output = spawn_job(&board, cfg, validator.clone(), StubLatency::new(&LATENCIES), pool(&POOL))
        .await
        .unwrap();

    let results = board.progress(ScanCategory::Reality).results;
    assert_eq!(results.len(), 5);
    assert!(results.iter().chain(output.iter()).all(|c| validator.would_pass(c)));
}

#[tokio::test]
async fn nothing_is_admitted_after_early_stop() {
    let board = JobBoard::new();
    let validator = Arc::new(StubValidator::new());
    let items: Vec<String> = (0..50).map(|i| format!("c{i}")).collect();
    // stop after ceil(1 * 2.0) = 2 passes
    let cfg = domain_config()
        .with_required_count(1)
        .with_overfetch_factor(2.0)
        .with_concurrency_limit(3);

    spawn_job(&board, cfg, validator.clone(), StubLatency::new(&[]), items)
        .await
        .unwrap();

    // Three initial admissions plus one refill after the first pass.
    assert!(validator.started().len() <= 4, "started {:?}", validator.started());
    assert!(validator.peak() <= 3);
    assert_eq!(board.progress(ScanCategory::Reality).results.len(), 2);
}

#[tokio::test]
async fn cancellation_never_fabricates_a_pass() {
    let full_board = JobBoard::new();
    let full_validator = Arc::new(staggered_validator().fail(&["p2", "p5"]));
    let cfg = domain_config().with_required_count(8).with_concurrency_limit(2);
    spawn_job(&full_board, cfg.clone(), full_validator, StubLatency::new(&LATENCIES), pool(&POOL))
        .await
        .unwrap();
    let uncancelled: HashSet<String> = full_board.progress(ScanCategory::Reality).results.into_iter().collect();

    let board = JobBoard::new();
    let validator = Arc::new(
        staggered_validator()
            .fail(&["p2", "p5"])
            .delay("p7", Duration::from_secs(30)),
    );
    let mut rx = board.subscribe(ScanCategory::Reality);
    let job = spawn_job(&board, cfg, validator, StubLatency::new(&LATENCIES), pool(&POOL));
    rx.wait_for(|p| p.done >= 3).await.unwrap();
    board.cancel(ScanCategory::Reality).unwrap();
    let output = job.await.unwrap();

    let partial = board.progress(ScanCategory::Reality);
    assert!(partial.is_completed());
    assert!(partial.results.iter().all(|c| uncancelled.contains(c)));
    assert!(output.iter().all(|c| partial.results.contains(c)));
}

#[tokio::test]
async fn identical_inputs_give_identical_rankings() {
    let mut rankings = Vec::new();
    for _ in 0..3 {
        let board = JobBoard::new();
        let cfg = domain_config().with_required_count(3).with_concurrency_limit(4);
        let validator = Arc::new(staggered_validator().fail(&["p4"]));
        let output = spawn_job(&board, cfg, validator, StubLatency::new(&LATENCIES), pool(&POOL[..5]))
            .await
            .unwrap();
        rankings.push(output);
    }

    assert_eq!(rankings[0], vec!["p1", "p2", "p0"]);
    assert!(rankings.iter().all(|r| r == &rankings[0]));
}
