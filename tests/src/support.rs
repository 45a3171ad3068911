use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fronter_common::candidate::{Candidate, Stage, ValidationOutcome};
use fronter_common::config::ScanConfig;
use fronter_common::job::JobProgress;
use fronter_common::provider::ScanCategory;
use fronter_core::job::JobBoard;
use fronter_core::ranker::LatencyProbe;
use fronter_core::scanner::Validator;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(5);

/// Fixed pass/fail verdicts and delays per candidate. Unlisted candidates
/// pass after [`DEFAULT_DELAY`].
#[derive(Default)]
pub struct StubValidator {
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    started: Mutex<Vec<String>>,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl StubValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(mut self, candidates: &[&str]) -> Self {
        self.failing.extend(candidates.iter().map(|c| c.to_string()));
        self
    }

    pub fn delay(mut self, candidate: &str, delay: Duration) -> Self {
        self.delays.insert(candidate.to_string(), delay);
        self
    }

    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn would_pass(&self, candidate: &str) -> bool {
        !self.failing.contains(candidate)
    }
}

#[async_trait]
impl Validator for StubValidator {
    async fn validate(&self, candidate: &str, _stop: &CancellationToken) -> ValidationOutcome {
        self.started.lock().unwrap().push(candidate.to_string());
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays.get(candidate).copied().unwrap_or(DEFAULT_DELAY);
        tokio::time::sleep(delay).await;

        self.active.fetch_sub(1, Ordering::SeqCst);
        if self.failing.contains(candidate) {
            ValidationOutcome::fail(candidate, Stage::RawReachability)
        } else {
            ValidationOutcome::pass(candidate)
        }
    }
}

/// Latency lookup table; unlisted candidates are unmeasurable.
pub struct StubLatency(HashMap<String, f64>);

impl StubLatency {
    pub fn new(table: &[(&str, f64)]) -> Self {
        Self(table.iter().map(|(c, ms)| (c.to_string(), *ms)).collect())
    }
}

#[async_trait]
impl LatencyProbe for StubLatency {
    async fn measure(&self, candidate: &str) -> Option<f64> {
        self.0.get(candidate).copied()
    }
}

pub fn pool(items: &[&str]) -> Vec<Candidate> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn domain_config() -> ScanConfig {
    ScanConfig::for_category(ScanCategory::Reality)
}

/// Records every snapshot the slot publishes until the job completes.
pub fn record_progress(mut rx: watch::Receiver<JobProgress>) -> JoinHandle<Vec<JobProgress>> {
    tokio::spawn(async move {
        let mut seen = Vec::new();
        loop {
            let snapshot = rx.borrow_and_update().clone();
            let done = snapshot.is_completed();
            seen.push(snapshot);
            if done || rx.changed().await.is_err() {
                return seen;
            }
        }
    })
}

/// Starts a background job on `board` with a fixed pool.
pub fn spawn_job(
    board: &JobBoard,
    cfg: ScanConfig,
    validator: Arc<StubValidator>,
    latency: StubLatency,
    items: Vec<Candidate>,
) -> JoinHandle<Vec<Candidate>> {
    fronter_core::engine::start_job(board, cfg, validator, Arc::new(latency), move |_| async move {
        items
    })
    .unwrap()
}

/// A loopback port with nothing listening on it.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// A loopback port that accepts and immediately closes every connection.
pub async fn open_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            drop(socket);
        }
    });
    port
}

/// Minimal RDAP endpoint answering every request with `body`.
/// Returns the base URL and a request counter.
pub async fn rdap_server(body: &'static str) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/rdap+json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
        }
    });

    (format!("http://{addr}"), hits)
}
