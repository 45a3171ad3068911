use std::time::Duration;

use reqwest::{Client, StatusCode, redirect};
use tracing::trace;

const MAX_REDIRECTS: usize = 10;
const USER_AGENT: &str = concat!("fronter/", env!("CARGO_PKG_VERSION"));

/// Builds the shared client used for region-access checks and RDAP lookups.
pub fn build_client() -> anyhow::Result<Client> {
    let client = Client::builder()
        .redirect(redirect::Policy::limited(MAX_REDIRECTS))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Issues `GET https://{host}` following redirects and reports whether the
/// final response is `200 OK` within `deadline`.
///
/// The request leaves from this machine, so a pass only says the host is
/// reachable from wherever the process runs.
pub async fn https_ok(client: &Client, host: &str, deadline: Duration) -> bool {
    let url = format!("https://{host}");
    match client.get(&url).timeout(deadline).send().await {
        Ok(resp) => {
            let status = resp.status();
            trace!(host, %status, "region access response");
            status == StatusCode::OK
        }
        Err(e) => {
            trace!(host, "region access request failed: {e}");
            false
        }
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
