//! Live job progress rendered as a bar attached to a tracing span, so log
//! lines written through the indicatif layer never tear it.

use colored::*;
use fronter_common::job::JobProgress;
use indicatif::ProgressStyle;
use tokio::sync::watch;
use tracing::info_span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TEMPLATE: &str = "{spinner:.blue} [{elapsed_precise}] {wide_bar:.green/black} {pos}/{len} {msg}";

fn style() -> ProgressStyle {
    ProgressStyle::with_template(TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ])
}

fn message(progress: &JobProgress) -> String {
    let clean = format!("{} clean", progress.results.len()).green().bold();
    if progress.cancel_requested {
        format!("{clean} {}", "(cancelling)".yellow())
    } else {
        clean.to_string()
    }
}

/// Follows a job slot until the job completes or the slot goes away.
pub async fn track(mut rx: watch::Receiver<JobProgress>) {
    let span = info_span!("progress");
    span.pb_set_style(&style());
    span.pb_start();

    loop {
        let snapshot = rx.borrow_and_update().clone();
        span.pb_set_length(snapshot.total as u64);
        span.pb_set_position(snapshot.done as u64);
        span.pb_set_message(&message(&snapshot));

        if snapshot.is_completed() || rx.changed().await.is_err() {
            break;
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
