//! Utility functions for CLI commands.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use anyhow::Context as _;
use giztoy_reid::{Config, Matcher, Snapshot};
use serde::Deserialize;
use tracing::{debug, info};

use crate::Cli;

/// One line of embedding input.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmbeddingLine {
    Bare(Vec<f32>),
    Tagged { embedding: Vec<f32> },
}

impl EmbeddingLine {
    fn into_vec(self) -> Vec<f32> {
        match self {
            Self::Bare(v) | Self::Tagged { embedding: v } => v,
        }
    }
}

/// Loads a YAML or JSON file, picking the format by extension.
pub fn load_file<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("yaml");

    let result = match ext.to_lowercase().as_str() {
        "json" => serde_json::from_str(&content)?,
        _ => serde_yaml::from_str(&content)?,
    };

    Ok(result)
}

/// Gets the matcher configuration, defaulting when no file is given.
pub fn get_config(cli: &Cli) -> anyhow::Result<Config> {
    let cfg: Config = match cli.config.as_deref() {
        Some(path) => load_file(path).with_context(|| format!("invalid config {path}"))?,
        None => Config::default(),
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a matcher from the snapshot file, or an empty one if the file
/// is not given or does not exist yet.
pub fn load_matcher(cli: &Cli, cfg: Config) -> anyhow::Result<Matcher> {
    match cli.snapshot.as_deref() {
        Some(path) if Path::new(path).exists() => {
            let snap = Snapshot::load(path).with_context(|| format!("failed to load {path}"))?;
            let m = Matcher::from_snapshot(cfg, snap)?;
            info!(path, stored = m.len(), next_id = m.next_id(), "loaded snapshot");
            Ok(m)
        }
        Some(path) => {
            debug!(path, "snapshot not found, starting empty");
            Ok(Matcher::empty(cfg)?)
        }
        None => Ok(Matcher::empty(cfg)?),
    }
}

/// Requires the snapshot path to be provided.
pub fn require_snapshot(cli: &Cli) -> anyhow::Result<&str> {
    cli.snapshot
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("snapshot file is required, use -s flag"))
}

/// Reads embeddings, one JSON vector per line. `None` or `"-"` reads stdin.
pub fn read_embeddings(path: Option<&str>) -> anyhow::Result<Vec<Vec<f32>>> {
    let reader: Box<dyn Read> = match path {
        None | Some("-") => Box::new(io::stdin()),
        Some(p) => Box::new(File::open(p).with_context(|| format!("failed to open {p}"))?),
    };
    parse_embeddings(BufReader::new(reader))
}

pub(crate) fn parse_embeddings(reader: impl BufRead) -> anyhow::Result<Vec<Vec<f32>>> {
    let mut out = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let emb: EmbeddingLine =
            serde_json::from_str(line).with_context(|| format!("line {}", n + 1))?;
        out.push(emb.into_vec());
    }
    Ok(out)
}

/// Outputs result as JSON or YAML.
pub fn output_result<T: serde::Serialize>(
    result: &T,
    output_path: Option<&str>,
    as_json: bool,
) -> anyhow::Result<()> {
    let output = if as_json {
        serde_json::to_string_pretty(result)?
    } else {
        serde_yaml::to_string(result)?
    };

    match output_path {
        Some(path) => std::fs::write(path, output)?,
        None => print!("{}", output),
    }

    Ok(())
}
