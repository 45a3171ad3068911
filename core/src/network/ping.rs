//! ICMP echo through the platform `ping` binary.
//!
//! Raw ICMP sockets need privileges this tool should not ask for, so the
//! system utility does the work. It runs as an async child process and never
//! blocks the runtime.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::trace;

/// Extra wall-clock allowance on top of the ping's own reply deadline.
const PROCESS_GRACE: Duration = Duration::from_secs(2);

fn ping_command(host: &str, wait: Duration) -> Command {
    let secs = wait.as_secs().max(1).to_string();
    let mut cmd = Command::new("ping");

    if cfg!(target_os = "windows") {
        let millis = wait.as_millis().max(1).to_string();
        cmd.args(["-n", "1", "-w", millis.as_str(), host]);
    } else if cfg!(target_os = "macos") {
        cmd.args(["-c", "1", "-t", secs.as_str(), host]);
    } else {
        cmd.args(["-c", "1", "-W", secs.as_str(), host]);
    }

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);
    cmd
}

/// Runs one echo request and returns the tool's output if it exited successfully.
async fn run_once(host: &str, wait: Duration) -> Option<String> {
    let output = match timeout(wait + PROCESS_GRACE, ping_command(host, wait).output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            trace!(host, "failed to spawn ping: {e}");
            return None;
        }
        Err(_elapsed) => {
            trace!(host, "ping did not exit in time");
            return None;
        }
    };

    if !output.status.success() {
        trace!(host, status = ?output.status, "ping reported no reply");
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// `true` iff the ping output shows an echo reply.
pub fn has_reply(output: &str) -> bool {
    output.contains("bytes from") || output.contains("icmp_seq") || output.contains("TTL=")
}

/// Extracts the round-trip time in milliseconds from ping output.
///
/// Understands `time=12.3 ms`, `time=12ms` and Windows' `time<1ms`.
pub fn parse_latency(output: &str) -> Option<f64> {
    for line in output.lines() {
        let lower = line.to_lowercase();
        if let Some((_, rest)) = lower.split_once("time=") {
            let number: String = rest
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            if let Ok(ms) = number.parse::<f64>() {
                return Some(ms);
            }
        } else if lower.contains("time<1ms") {
            return Some(1.0);
        }
    }
    None
}

/// Sends a single echo request and reports whether a reply arrived.
pub async fn is_alive(host: &str, wait: Duration) -> bool {
    run_once(host, wait).await.is_some_and(|out| has_reply(&out))
}

/// Round-trip time of a single echo, in milliseconds.
pub async fn latency_ms(host: &str, wait: Duration) -> Option<f64> {
    run_once(host, wait).await.and_then(|out| parse_latency(&out))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
