use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::ReidError;
use crate::matcher::{Matcher, Seed};

/// Persisted form of a matcher's store.
///
/// Holds everything needed to rebuild a matcher that behaves identically:
/// the embeddings, their labels (same order), and the next identity.
/// Thresholds and metric are configuration and are supplied again on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Embedding dimension, or `None` if nothing was ever stored.
    #[serde(default)]
    pub dim: Option<usize>,
    pub embeddings: Vec<Vec<f32>>,
    pub labels: Vec<u64>,
    pub next_id: u64,
}

impl Snapshot {
    /// Encodes the snapshot as JSON.
    pub fn write_json(&self, w: &mut dyn Write) -> Result<(), ReidError> {
        let mut bw = BufWriter::new(w);
        serde_json::to_writer(&mut bw, self).map_err(|e| ReidError::Io(e.to_string()))?;
        bw.flush().map_err(|e| ReidError::Io(e.to_string()))
    }

    /// Decodes a snapshot from JSON.
    pub fn read_json(r: &mut dyn Read) -> Result<Self, ReidError> {
        serde_json::from_reader(BufReader::new(r)).map_err(|e| ReidError::Snapshot(e.to_string()))
    }

    /// Writes the snapshot to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ReidError> {
        let mut f = File::create(path).map_err(|e| ReidError::Io(e.to_string()))?;
        self.write_json(&mut f)
    }

    /// Reads a snapshot from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReidError> {
        let mut f = File::open(path).map_err(|e| ReidError::Io(e.to_string()))?;
        Self::read_json(&mut f)
    }
}

impl Matcher {
    /// Captures the store, labels and next identity.
    pub fn snapshot(&self) -> Snapshot {
        let store = self.store();
        Snapshot {
            dim: store.dim(),
            embeddings: store.rows().map(<[f32]>::to_vec).collect(),
            labels: store.labels().to_vec(),
            next_id: self.next_id(),
        }
    }

    /// Rebuilds a matcher from a snapshot.
    ///
    /// `cfg.dim`, when set, must agree with the snapshot. The stored
    /// `next_id` must equal the one derived from the labels.
    pub fn from_snapshot(mut cfg: Config, snap: Snapshot) -> Result<Self, ReidError> {
        match (cfg.dim, snap.dim) {
            (Some(want), Some(got)) if want != got => {
                return Err(ReidError::Snapshot(format!(
                    "dimension {got} does not match configured {want}"
                )));
            }
            (None, dim) => cfg.dim = dim,
            _ => {}
        }

        let next_id = snap.next_id;
        let m = Matcher::new(
            cfg,
            Seed::From {
                embeddings: snap.embeddings,
                labels: snap.labels,
            },
        )?;
        if m.next_id() != next_id {
            return Err(ReidError::Snapshot(format!(
                "next_id {next_id} inconsistent with labels (want {})",
                m.next_id()
            )));
        }
        Ok(m)
    }
}
