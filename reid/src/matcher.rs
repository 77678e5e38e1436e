use tracing::{debug, trace};

use crate::config::{Config, Thresholds};
use crate::error::ReidError;
use crate::metric::Metric;
use crate::store::EmbeddingStore;

/// Initial contents of a [`Matcher`].
#[derive(Debug, Clone, Default)]
pub enum Seed {
    /// Start with an empty store. The first identity is 0.
    #[default]
    Empty,

    /// Start from previously stored `(embedding, label)` pairs, in order.
    /// `embeddings` and `labels` must have the same length.
    From {
        embeddings: Vec<Vec<f32>>,
        labels: Vec<u64>,
    },
}

/// Outcome of matching one embedding against the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// Identity assigned to the embedding.
    pub label: u64,

    /// True if `label` is a freshly minted identity.
    pub is_new: bool,

    /// Index of the best-scoring stored embedding. `None` on an empty store.
    pub best_index: Option<usize>,

    /// Score of the best match. `None` on an empty store.
    pub score: Option<f32>,
}

/// Assigns stable identity labels to embeddings.
///
/// Each query is scored against every stored embedding; if the best match
/// clears the normal threshold its label is reused, otherwise a new label
/// is minted. Committed queries are appended to the store, which only ever
/// grows, so a label once assigned is never revisited.
///
/// Commits take `&mut self`. Use [`SharedMatcher`](crate::SharedMatcher)
/// to share one matcher between threads.
#[derive(Debug, Clone)]
pub struct Matcher {
    cfg: Config,
    store: EmbeddingStore,
    next_id: u64,
}

impl Matcher {
    /// Creates a matcher from `cfg` and initial contents.
    ///
    /// The next identity is `max(labels) + 1` for a non-empty seed and 0
    /// otherwise.
    pub fn new(cfg: Config, seed: Seed) -> Result<Self, ReidError> {
        cfg.validate()?;
        let mut store = EmbeddingStore::new(cfg.dim);
        let mut next_id = 0;

        if let Seed::From { embeddings, labels } = seed {
            if embeddings.len() != labels.len() {
                return Err(ReidError::InvalidSeed {
                    embeddings: embeddings.len(),
                    labels: labels.len(),
                });
            }
            for (index, (emb, &label)) in embeddings.iter().zip(&labels).enumerate() {
                store.push(emb, label).map_err(|e| match e {
                    ReidError::DimensionMismatch { expected, got } => {
                        ReidError::InvalidSeedRow {
                            index,
                            expected,
                            got,
                        }
                    }
                    other => other,
                })?;
            }
            next_id = match labels.iter().max() {
                Some(&max) => max.checked_add(1).ok_or(ReidError::LabelOverflow)?,
                None => 0,
            };
            debug!(
                rows = store.len(),
                next_id, "reid: matcher seeded from existing store"
            );
        }

        Ok(Self {
            cfg,
            store,
            next_id,
        })
    }

    /// Creates an empty matcher.
    pub fn empty(cfg: Config) -> Result<Self, ReidError> {
        Self::new(cfg, Seed::Empty)
    }

    /// Scores `target` against every stored embedding, in store order.
    ///
    /// An empty store yields an empty vector.
    pub fn score(&self, target: &[f32], metric: Metric) -> Result<Vec<f32>, ReidError> {
        self.store.check(target)?;
        let scores: Vec<f32> = self
            .store
            .rows()
            .map(|row| metric.score(target, row))
            .collect();
        trace!(n = scores.len(), %metric, "reid: scored target");
        Ok(scores)
    }

    /// Decides the identity of `target` without touching the store.
    ///
    /// Ties on the best score go to the lowest store index.
    pub fn decide(&self, target: &[f32]) -> Result<Decision, ReidError> {
        let metric = self.cfg.metric;
        let scores = self.score(target, metric)?;

        let mut best: Option<(usize, f32)> = None;
        for (i, &s) in scores.iter().enumerate() {
            match best {
                Some((_, top)) if !metric.better(s, top) => {}
                _ => best = Some((i, s)),
            }
        }

        let matched = best.and_then(|(idx, top)| {
            if metric.accepts(top, self.cfg.thresholds.normal) {
                self.store.label(idx)
            } else {
                None
            }
        });

        Ok(Decision {
            label: matched.unwrap_or(self.next_id),
            is_new: matched.is_none(),
            best_index: best.map(|(i, _)| i),
            score: best.map(|(_, s)| s),
        })
    }

    /// Returns the identity of `target`. With `commit` the embedding and its
    /// label are appended to the store; without it the call is a dry run
    /// that leaves the matcher unchanged.
    pub fn identify(&mut self, target: &[f32], commit: bool) -> Result<u64, ReidError> {
        self.identify_detailed(target, commit).map(|d| d.label)
    }

    /// Like [`Matcher::identify`] but returns the full [`Decision`].
    pub fn identify_detailed(
        &mut self,
        target: &[f32],
        commit: bool,
    ) -> Result<Decision, ReidError> {
        let decision = self.decide(target)?;
        if commit {
            self.commit(target, &decision)?;
        }
        debug!(
            label = decision.label,
            is_new = decision.is_new,
            score = ?decision.score,
            commit,
            "reid: identified"
        );
        Ok(decision)
    }

    /// Appends `target` under the decided label.
    pub(crate) fn commit(&mut self, target: &[f32], decision: &Decision) -> Result<(), ReidError> {
        let next_id = if decision.label == self.next_id {
            self.next_id
                .checked_add(1)
                .ok_or(ReidError::LabelOverflow)?
        } else {
            self.next_id
        };
        self.store.push(target, decision.label)?;
        self.next_id = next_id;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn thresholds(&self) -> Thresholds {
        self.cfg.thresholds
    }

    /// Returns the established embedding dimension, if any.
    pub fn dim(&self) -> Option<usize> {
        self.store.dim()
    }

    /// Returns the number of stored embeddings.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns the identity the next unseen subject will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Returns stored labels in insertion order.
    pub fn labels(&self) -> &[u64] {
        self.store.labels()
    }

    pub fn store(&self) -> &EmbeddingStore {
        &self.store
    }
}
