//! Registry ownership lookups over RDAP.
//!
//! Only the fields that can carry an operator name are decoded: the network
//! `name` and `handle`, the `fn` entry of every entity vCard (recursively) and
//! free-text remarks. Registries put the AS or organisation description in
//! one of those.

use std::net::Ipv4Addr;
use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

#[derive(Debug, Default, Deserialize)]
pub struct RdapNetwork {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub entities: Vec<RdapEntity>,
    #[serde(default)]
    pub remarks: Vec<RdapRemark>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RdapEntity {
    #[serde(rename = "vcardArray", default)]
    pub vcard_array: Option<Value>,
    #[serde(default)]
    pub entities: Vec<RdapEntity>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RdapRemark {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Vec<String>,
}

impl RdapEntity {
    /// Formatted names (`fn`) found in this entity's vCard.
    fn formatted_names(&self) -> Vec<String> {
        let Some(Value::Array(card)) = &self.vcard_array else {
            return Vec::new();
        };
        let Some(Value::Array(properties)) = card.get(1) else {
            return Vec::new();
        };

        properties
            .iter()
            .filter_map(|prop| {
                let prop = prop.as_array()?;
                if prop.first()?.as_str()? != "fn" {
                    return None;
                }
                prop.get(3)?.as_str().map(str::to_string)
            })
            .collect()
    }

    fn collect_names(&self, out: &mut Vec<String>) {
        out.extend(self.formatted_names());
        for nested in &self.entities {
            nested.collect_names(out);
        }
    }
}

impl RdapNetwork {
    /// Every text field that may name the operator, lowercased.
    pub fn owner_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        names.extend(self.name.iter().cloned());
        names.extend(self.handle.iter().cloned());
        for entity in &self.entities {
            entity.collect_names(&mut names);
        }
        for remark in &self.remarks {
            names.extend(remark.title.iter().cloned());
            names.extend(remark.description.iter().cloned());
        }
        names.into_iter().map(|n| n.to_lowercase()).collect()
    }

    /// Case-insensitive substring match of `fragment` against [`Self::owner_names`].
    pub fn mentions(&self, fragment: &str) -> bool {
        let fragment = fragment.to_lowercase();
        self.owner_names().iter().any(|name| name.contains(&fragment))
    }
}

pub async fn lookup(
    client: &Client,
    base: &str,
    ip: Ipv4Addr,
    deadline: Duration,
) -> anyhow::Result<RdapNetwork> {
    let url = format!("{}/ip/{ip}", base.trim_end_matches('/'));
    let record = client
        .get(&url)
        .header(reqwest::header::ACCEPT, "application/rdap+json, application/json")
        .timeout(deadline)
        .send()
        .await
        .with_context(|| format!("requesting {url}"))?
        .error_for_status()?
        .json::<RdapNetwork>()
        .await
        .with_context(|| format!("decoding RDAP response from {url}"))?;
    Ok(record)
}

/// `true` iff the registry record for `ip` mentions `fragment`.
/// Lookup failures of any kind count as a mismatch.
pub async fn ownership_matches(
    client: &Client,
    base: &str,
    ip: Ipv4Addr,
    fragment: &str,
    deadline: Duration,
) -> bool {
    match lookup(client, base, ip, deadline).await {
        Ok(record) => {
            let matched = record.mentions(fragment);
            trace!(%ip, fragment, matched, names = ?record.owner_names(), "rdap record");
            matched
        }
        Err(e) => {
            debug!(%ip, "rdap lookup failed: {e:#}");
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
