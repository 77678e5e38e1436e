use serde::{Deserialize, Serialize};

use crate::error::ReidError;
use crate::metric::Metric;

/// Match-acceptance thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// A best match must score strictly past this value to reuse its label.
    /// Default: 0.70.
    pub normal: f32,

    /// Stricter tier for high-certainty decisions made by callers.
    /// Not consulted by [`Matcher::identify`](crate::Matcher::identify).
    /// Default: 0.95.
    pub extreme: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            normal: 0.70,
            extreme: 0.95,
        }
    }
}

impl Thresholds {
    /// Checks the ordering constraints for `metric`.
    ///
    /// - cosine: `0 < normal <= extreme <= 1`
    /// - euclidean: `0 <= extreme <= normal` (smaller distance is stricter)
    pub fn validate(&self, metric: Metric) -> Result<(), ReidError> {
        let (normal, extreme) = (self.normal, self.extreme);
        let ok = match metric {
            Metric::Cosine => 0.0 < normal && normal <= extreme && extreme <= 1.0,
            Metric::Euclidean => 0.0 <= extreme && extreme <= normal && normal.is_finite(),
        };
        if ok {
            Ok(())
        } else {
            Err(ReidError::InvalidThresholds { normal, extreme })
        }
    }

    /// Reports whether `score` clears the normal tier.
    pub fn is_normal(&self, metric: Metric, score: f32) -> bool {
        metric.accepts(score, self.normal)
    }

    /// Reports whether `score` clears the extreme tier.
    pub fn is_extreme(&self, metric: Metric, score: f32) -> bool {
        metric.accepts(score, self.extreme)
    }
}

/// Controls matcher behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Embedding dimension. `None` lets the first seed row or the first
    /// committed embedding fix it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dim: Option<usize>,

    pub thresholds: Thresholds,

    /// Metric used by `identify`. Default: cosine.
    pub metric: Metric,
}

impl Config {
    /// Validates dimension and thresholds.
    pub fn validate(&self) -> Result<(), ReidError> {
        if self.dim == Some(0) {
            return Err(ReidError::EmptyEmbedding);
        }
        self.thresholds.validate(self.metric)
    }
}
