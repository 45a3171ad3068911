//! Downloads line-oriented candidate lists.
//!
//! A source that cannot be fetched is logged and skipped; the remaining
//! sources still contribute to the pool.

use std::time::Duration;

use fronter_common::FronterError;
use fronter_common::candidate::Candidate;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::pool::source_lines;

#[derive(Debug, Clone)]
pub struct SourceFetcher {
    client: Client,
    timeout: Duration,
}

impl SourceFetcher {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<Candidate>, FronterError> {
        let failed = |reason: String| FronterError::SourceFetch {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| failed(e.to_string()))?;
        let body = response.text().await.map_err(|e| failed(e.to_string()))?;

        Ok(source_lines(&body).collect())
    }

    /// Fetches every URL in order. Stops between sources once `cancel`
    /// fires and returns what was gathered so far.
    pub async fn fetch_all(&self, urls: &[String], cancel: &CancellationToken) -> Vec<Candidate> {
        let mut items = Vec::new();
        for url in urls {
            if cancel.is_cancelled() {
                info!("Cancel requested. Skipping remaining sources.");
                break;
            }
            match self.fetch(url).await {
                Ok(fetched) => {
                    info!("Fetched {} items from {url}", fetched.len());
                    items.extend(fetched);
                }
                Err(e) => warn!("{e}"),
            }
        }
        items
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
