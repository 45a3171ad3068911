pub mod auto;
pub mod check;
pub mod info;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use fronter_common::config::{
    DEFAULT_CONCURRENCY_LIMIT, DEFAULT_OVERFETCH_FACTOR, DEFAULT_REQUIRED_COUNT, ScanConfig,
};
use fronter_common::provider::ScanCategory;

#[derive(Parser)]
#[command(name = "fronter")]
#[command(about = "Finds clean, low-latency CDN front-ends and domains.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// More log output (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Less log output (-q, -qq)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a pool from the sources file, validate it and rank the survivors
    #[command(alias = "a")]
    Auto {
        /// reality, fastly or cloudflare
        category: ScanCategory,
        #[command(flatten)]
        tuning: Tuning,
        /// Sources file listing source URLs and static ranges
        #[arg(long, default_value = "sources.json")]
        sources: PathBuf,
    },
    /// Validate an explicit list of candidates
    #[command(alias = "c")]
    Check {
        category: ScanCategory,
        #[arg(required = true)]
        items: Vec<String>,
        #[command(flatten)]
        tuning: Tuning,
    },
    /// Show provider profiles and the sources file summary
    #[command(alias = "i")]
    Info {
        #[arg(long, default_value = "sources.json")]
        sources: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct Tuning {
    /// Number of ranked results to keep
    #[arg(short = 'n', long, default_value_t = DEFAULT_REQUIRED_COUNT)]
    pub count: usize,
    /// Clean candidates to gather per requested result before stopping
    #[arg(long, default_value_t = DEFAULT_OVERFETCH_FACTOR)]
    pub overfetch: f64,
    /// Maximum probes in flight
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY_LIMIT)]
    pub concurrency: usize,
    /// Skip the TLS-SNI stage of the address pipeline
    #[arg(long)]
    pub no_tls: bool,
}

impl Tuning {
    pub fn config(&self, category: ScanCategory) -> ScanConfig {
        ScanConfig::for_category(category)
            .with_required_count(self.count)
            .with_overfetch_factor(self.overfetch)
            .with_concurrency_limit(self.concurrency)
            .with_tls_check(!self.no_tls)
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
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
