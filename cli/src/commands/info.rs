use std::path::Path;

use anyhow::Context;
use colored::*;
use fronter_common::config::{ScanConfig, SourcesFile};
use fronter_common::provider::{Provider, ScanCategory};

use crate::terminal::{colors, print};

pub fn info(sources_path: &Path) -> anyhow::Result<()> {
    let defaults = ScanConfig::default();
    print::header("defaults", 0);
    print::aligned_line("count", defaults.required_count.to_string());
    print::aligned_line("overfetch", defaults.overfetch_factor.to_string());
    print::aligned_line("concurrency", defaults.concurrency_limit.to_string());
    print::aligned_line("probe port", defaults.probe_port.to_string());
    print::aligned_line("registry", defaults.rdap_base.clone());

    print::header("provider profiles", 0);
    for (idx, provider) in Provider::ALL.into_iter().enumerate() {
        let profile = provider.profile();
        print::tree_head(idx + 1, provider.as_str());
        let mut rows: Vec<(String, ColoredString)> = vec![(
            "owner".to_string(),
            profile.ownership_fragment.color(colors::ACCENT),
        )];
        rows.extend(
            profile
                .sni_hosts
                .iter()
                .map(|host| ("sni".to_string(), host.color(colors::TEXT_DEFAULT))),
        );
        print::as_tree_one_level(rows);
    }

    let sources = SourcesFile::load(sources_path)
        .with_context(|| format!("loading {}", sources_path.display()))?;
    print::header("sources", 0);
    print::aligned_line("file", sources_path.display().to_string());
    for category in ScanCategory::ALL {
        let summary = format!(
            "{} urls, {} ranges",
            sources.urls_for(category).len(),
            sources.ranges_for(category).len()
        );
        print::aligned_line(category.as_str(), summary);
    }
    Ok(())
}
