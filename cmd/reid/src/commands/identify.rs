//! Identity assignment over an embedding stream.

use clap::Args;
use giztoy_reid::Matcher;
use serde::Serialize;
use tracing::info;

use super::{get_config, load_matcher, output_result, read_embeddings, require_snapshot};
use crate::Cli;

/// Assign identities to a stream of embeddings.
#[derive(Args)]
pub struct IdentifyCommand {
    /// Embeddings file, one JSON vector per line ("-" for stdin)
    #[arg(short = 'f', long = "file")]
    input: Option<String>,

    /// Preview decisions without storing anything
    #[arg(long)]
    dry_run: bool,

    /// Normal match threshold (overrides config file)
    #[arg(long)]
    threshold: Option<f32>,

    /// Write the updated store back to the snapshot file
    #[arg(long, conflicts_with = "dry_run")]
    save: bool,
}

/// Decision for one input embedding.
#[derive(Debug, Serialize)]
pub struct IdentifyRecord {
    pub index: usize,
    pub label: u64,
    pub is_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    /// Best match cleared the extreme threshold.
    pub extreme: bool,
}

#[derive(Debug, Serialize)]
pub struct IdentifyReport {
    pub results: Vec<IdentifyRecord>,
    pub new_identities: usize,
    pub stored: usize,
    pub next_id: u64,
    pub dry_run: bool,
}

impl IdentifyCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let mut cfg = get_config(cli)?;
        if let Some(t) = self.threshold {
            cfg.thresholds.normal = t;
            cfg.validate()?;
        }
        let save_path = if self.save {
            Some(require_snapshot(cli)?)
        } else {
            None
        };

        let mut matcher = load_matcher(cli, cfg)?;
        let embeddings = read_embeddings(self.input.as_deref())?;
        let report = identify_all(&mut matcher, &embeddings, !self.dry_run)?;

        info!(
            inputs = embeddings.len(),
            new = report.new_identities,
            stored = report.stored,
            "identify done"
        );

        if let Some(path) = save_path {
            matcher.snapshot().save(path)?;
            info!(path, "snapshot saved");
        }

        output_result(&report, cli.output.as_deref(), cli.json)
    }
}

fn identify_all(
    matcher: &mut Matcher,
    embeddings: &[Vec<f32>],
    commit: bool,
) -> anyhow::Result<IdentifyReport> {
    let thresholds = matcher.thresholds();
    let metric = matcher.config().metric;

    let mut results = Vec::with_capacity(embeddings.len());
    for (index, emb) in embeddings.iter().enumerate() {
        let d = matcher
            .identify_detailed(emb, commit)
            .map_err(|e| anyhow::anyhow!("embedding {index}: {e}"))?;
        results.push(IdentifyRecord {
            index,
            label: d.label,
            is_new: d.is_new,
            score: d.score,
            extreme: d.score.is_some_and(|s| thresholds.is_extreme(metric, s)),
        });
    }

    Ok(IdentifyReport {
        new_identities: results.iter().filter(|r| r.is_new).count(),
        results,
        stored: matcher.len(),
        next_id: matcher.next_id(),
        dry_run: !commit,
    })
}
