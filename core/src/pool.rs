//! # Candidate Pool Builder
//!
//! Pure set assembly: expands static CIDR ranges into individual addresses
//! and merges them with text already fetched from source lists. No network
//! access happens here.

use std::collections::BTreeSet;

use fronter_common::candidate::Candidate;
use fronter_common::network::range::Ipv4Range;
use tracing::{debug, warn};

#[derive(Debug, Default, Clone)]
pub struct CandidatePool {
    items: BTreeSet<Candidate>,
    skipped_ranges: usize,
}

impl CandidatePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expands every range into its addresses. Malformed ranges are logged
    /// and skipped.
    pub fn add_ranges<I, S>(&mut self, ranges: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for raw in ranges {
            match raw.as_ref().parse::<Ipv4Range>() {
                Ok(range) => {
                    debug!(range = raw.as_ref(), hosts = range.len(), "expanding range");
                    self.items.extend(range.iter().map(|ip| ip.to_string()));
                }
                Err(e) => {
                    warn!("Skipping range: {e}");
                    self.skipped_ranges += 1;
                }
            }
        }
        self
    }

    /// Adds one line-oriented source document. Blank lines and `#` comments
    /// are ignored.
    pub fn add_source_text(&mut self, text: &str) -> &mut Self {
        self.items.extend(source_lines(text));
        self
    }

    pub fn add_items<I>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = Candidate>,
    {
        self.items.extend(
            items
                .into_iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty()),
        );
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn skipped_ranges(&self) -> usize {
        self.skipped_ranges
    }

    pub fn into_vec(self) -> Vec<Candidate> {
        self.items.into_iter().collect()
    }
}

/// Trimmed, non-empty lines that are not `#` comments.
pub fn source_lines(text: &str) -> impl Iterator<Item = Candidate> + '_ {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
