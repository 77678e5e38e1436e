//! Snapshot summary.

use std::collections::BTreeMap;

use clap::Args;
use giztoy_reid::{Matcher, Metric, Thresholds};
use serde::Serialize;

use super::{get_config, load_matcher, output_result, require_snapshot};
use crate::Cli;

/// Summarize a snapshot.
#[derive(Args)]
pub struct InspectCommand {}

#[derive(Debug, Serialize)]
pub struct InspectReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dim: Option<usize>,
    pub stored: usize,
    pub next_id: u64,
    pub metric: Metric,
    pub thresholds: Thresholds,
    /// Number of stored embeddings per identity.
    pub identities: BTreeMap<u64, usize>,
}

impl InspectCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        require_snapshot(cli)?;
        let matcher = load_matcher(cli, get_config(cli)?)?;
        output_result(&summarize(&matcher), cli.output.as_deref(), cli.json)
    }
}

fn summarize(m: &Matcher) -> InspectReport {
    let mut identities = BTreeMap::new();
    for &label in m.labels() {
        *identities.entry(label).or_insert(0) += 1;
    }
    InspectReport {
        dim: m.dim(),
        stored: m.len(),
        next_id: m.next_id(),
        metric: m.config().metric,
        thresholds: m.thresholds(),
        identities,
    }
}
