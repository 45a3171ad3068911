use thiserror::Error;

use crate::provider::ScanCategory;

/// Errors surfaced to callers of the engine.
///
/// Candidate-level failures are never represented here: a failed probe is an
/// ordinary negative outcome, not an error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FronterError {
    #[error("required count must be greater than zero")]
    InvalidRequiredCount,

    #[error("overfetch factor must be greater than 1, got {0}")]
    InvalidOverfetch(f64),

    #[error("concurrency limit must be greater than zero")]
    InvalidConcurrency,

    #[error("candidate list is empty")]
    EmptyCandidates,

    #[error("a {0} scan is already running")]
    AlreadyRunning(ScanCategory),

    #[error("no {0} scan is running")]
    NotRunning(ScanCategory),

    #[error("invalid CIDR range '{range}': {reason}")]
    MalformedRange { range: String, reason: String },

    #[error("failed to fetch source {url}: {reason}")]
    SourceFetch { url: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}
