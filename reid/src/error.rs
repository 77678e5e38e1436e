use thiserror::Error;

/// Errors returned by reid operations.
#[derive(Debug, Error)]
pub enum ReidError {
    #[error("reid: dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("reid: invalid seed: {embeddings} embeddings, {labels} labels")]
    InvalidSeed { embeddings: usize, labels: usize },

    #[error("reid: invalid seed: row {index} has dimension {got}, want {expected}")]
    InvalidSeedRow {
        index: usize,
        expected: usize,
        got: usize,
    },

    #[error("reid: empty embedding")]
    EmptyEmbedding,

    #[error("reid: non-finite value at embedding index {index}")]
    NonFiniteEmbedding { index: usize },

    #[error("reid: identity label space exhausted")]
    LabelOverflow,

    #[error("reid: invalid thresholds: normal={normal}, extreme={extreme}")]
    InvalidThresholds { normal: f32, extreme: f32 },

    #[error("reid: invalid snapshot: {0}")]
    Snapshot(String),

    #[error("reid: {0}")]
    Io(String),
}
