//! Raw scores of one embedding against the store.

use clap::Args;
use giztoy_reid::Metric;
use serde::Serialize;

use super::{get_config, load_matcher, output_result, read_embeddings};
use crate::Cli;

/// Score one embedding against the stored embeddings.
#[derive(Args)]
pub struct ScoreCommand {
    /// File holding the target embedding ("-" for stdin)
    #[arg(short = 'f', long = "file")]
    input: Option<String>,

    /// Scoring metric: cosine or euclidean
    #[arg(long, default_value = "cosine")]
    metric: Metric,

    /// Only show the best N entries
    #[arg(long)]
    top: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ScoreEntry {
    pub index: usize,
    pub label: u64,
    pub score: f32,
}

#[derive(Debug, Serialize)]
pub struct ScoreReport {
    pub metric: Metric,
    pub stored: usize,
    pub scores: Vec<ScoreEntry>,
}

impl ScoreCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let matcher = load_matcher(cli, get_config(cli)?)?;
        let target = read_embeddings(self.input.as_deref())?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("no target embedding in input"))?;

        let scores = matcher.score(&target, self.metric)?;
        let mut entries: Vec<ScoreEntry> = scores
            .into_iter()
            .zip(matcher.labels())
            .enumerate()
            .map(|(index, (score, &label))| ScoreEntry {
                index,
                label,
                score,
            })
            .collect();
        if let Some(n) = self.top {
            rank(&mut entries, self.metric);
            entries.truncate(n);
        }

        let report = ScoreReport {
            metric: self.metric,
            stored: matcher.len(),
            scores: entries,
        };
        output_result(&report, cli.output.as_deref(), cli.json)
    }
}

/// Sorts best first. Stable, so equal scores keep store order.
fn rank(entries: &mut [ScoreEntry], metric: Metric) {
    entries.sort_by(|a, b| {
        let ord = a.score.total_cmp(&b.score);
        match metric {
            Metric::Cosine => ord.reverse(),
            Metric::Euclidean => ord,
        }
    });
}
