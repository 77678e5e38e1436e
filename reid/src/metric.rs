use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lower bound applied to each vector norm in [`cosine_similarity`].
pub const COSINE_EPS: f64 = 1e-6;

/// Pairwise scoring function between a target and a stored embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Cosine similarity. Higher is more similar, range about `[-1, 1]`.
    #[default]
    Cosine,
    /// L2 distance. Lower is more similar.
    Euclidean,
}

impl Metric {
    /// Scores `a` against `b`. Both slices must have the same length.
    pub fn score(self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Self::Cosine => cosine_similarity(a, b),
            Self::Euclidean => euclidean_distance(a, b),
        }
    }

    /// Reports whether score `a` is strictly better than score `b`.
    pub fn better(self, a: f32, b: f32) -> bool {
        match self {
            Self::Cosine => a > b,
            Self::Euclidean => a < b,
        }
    }

    /// Reports whether `score` clears `threshold`. The comparison is strict:
    /// a score exactly on the threshold is rejected.
    pub fn accepts(self, score: f32, threshold: f32) -> bool {
        self.better(score, threshold)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cosine => write!(f, "cosine"),
            Self::Euclidean => write!(f, "euclidean"),
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cosine" | "cos" => Ok(Self::Cosine),
            "euclidean" | "l2" => Ok(Self::Euclidean),
            other => Err(format!("unknown metric: {other}")),
        }
    }
}

/// Cosine similarity between two vectors.
///
/// Each norm is clamped to at least [`COSINE_EPS`], so a zero vector scores
/// 0 instead of dividing by zero. Uses f64 intermediate precision.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());

    let mut dot: f64 = 0.0;
    let mut norm_a: f64 = 0.0;
    let mut norm_b: f64 = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        let x = x as f64;
        let y = y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt().max(COSINE_EPS) * norm_b.sqrt().max(COSINE_EPS);
    (dot / denom) as f32
}

/// L2 distance between two vectors.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());

    let sum: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum();
    sum.sqrt() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_identical() {
        let s = cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        assert!((s - 1.0).abs() < 1e-6, "identical: got {s}");
    }

    #[test]
    fn cosine_orthogonal() {
        let s = cosine_similarity(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        assert!(s.abs() < 1e-6, "orthogonal: got {s}");
    }

    #[test]
    fn cosine_opposite() {
        let s = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((s + 1.0).abs() < 1e-6, "opposite: got {s}");
    }

    #[test]
    fn cosine_scale_invariant() {
        let s = cosine_similarity(&[1.0, 1.0], &[10.0, 10.0]);
        assert!((s - 1.0).abs() < 1e-6, "scaled: got {s}");
    }

    #[test]
    fn cosine_zero_vector_is_finite() {
        let s = cosine_similarity(&[0.0, 0.0, 0.0], &[1.0, 0.0, 0.0]);
        assert!(s.is_finite());
        assert_eq!(s, 0.0);
    }

    #[test]
    fn euclidean_known_distance() {
        let d = euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]);
        assert!((d - 5.0).abs() < 1e-6, "got {d}");
        assert_eq!(euclidean_distance(&[1.0, 2.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn better_and_accepts_follow_metric_direction() {
        assert!(Metric::Cosine.better(0.9, 0.8));
        assert!(!Metric::Cosine.better(0.8, 0.8));
        assert!(Metric::Euclidean.better(0.1, 0.2));
        assert!(!Metric::Euclidean.better(0.2, 0.2));

        assert!(!Metric::Cosine.accepts(0.7, 0.7));
        assert!(Metric::Cosine.accepts(0.71, 0.7));
        assert!(!Metric::Euclidean.accepts(0.5, 0.5));
        assert!(Metric::Euclidean.accepts(0.49, 0.5));
    }

    #[test]
    fn metric_parse_and_display() {
        assert_eq!("cosine".parse::<Metric>().unwrap(), Metric::Cosine);
        assert_eq!("L2".parse::<Metric>().unwrap(), Metric::Euclidean);
        assert!("manhattan".parse::<Metric>().is_err());
        assert_eq!(Metric::Euclidean.to_string(), "euclidean");
    }

    #[test]
    fn metric_serde_lowercase() {
        let s = serde_json::to_string(&Metric::Euclidean).unwrap();
        assert_eq!(s, "\"euclidean\"");
        let m: Metric = serde_json::from_str("\"cosine\"").unwrap();
        assert_eq!(m, Metric::Cosine);
    }
}
