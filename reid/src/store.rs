use crate::error::ReidError;

/// Append-only arena of fixed-width embedding rows paired with their
/// identity labels.
///
/// Rows live back to back in a single buffer, so an index stays valid for
/// the lifetime of the store. Nothing is ever removed or rewritten.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingStore {
    dim: Option<usize>,
    data: Vec<f32>,
    labels: Vec<u64>,
}

impl EmbeddingStore {
    /// Creates an empty store. `dim = None` lets the first row fix it.
    pub fn new(dim: Option<usize>) -> Self {
        Self {
            dim,
            data: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Returns the established dimension, if any.
    pub fn dim(&self) -> Option<usize> {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the row at `idx`.
    pub fn row(&self, idx: usize) -> Option<&[f32]> {
        let dim = self.dim?;
        let start = idx.checked_mul(dim)?;
        self.data.get(start..start.checked_add(dim)?)
    }

    /// Returns the label at `idx`.
    pub fn label(&self, idx: usize) -> Option<u64> {
        self.labels.get(idx).copied()
    }

    /// Returns all labels in insertion order.
    pub fn labels(&self) -> &[u64] {
        &self.labels
    }

    /// Iterates rows in insertion order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f32]> + '_ {
        // data is empty while dim is unset, so the chunk width is irrelevant.
        self.data.chunks_exact(self.dim.unwrap_or(1))
    }

    /// Checks that `emb` can be scored against or appended to this store.
    pub fn check(&self, emb: &[f32]) -> Result<(), ReidError> {
        if emb.is_empty() {
            return Err(ReidError::EmptyEmbedding);
        }
        if let Some(index) = emb.iter().position(|x| !x.is_finite()) {
            return Err(ReidError::NonFiniteEmbedding { index });
        }
        match self.dim {
            Some(dim) if dim != emb.len() => Err(ReidError::DimensionMismatch {
                expected: dim,
                got: emb.len(),
            }),
            _ => Ok(()),
        }
    }

    /// Appends a row and its label.
    pub fn push(&mut self, emb: &[f32], label: u64) -> Result<(), ReidError> {
        self.check(emb)?;
        let dim = *self.dim.get_or_insert(emb.len());

        self.data.extend_from_slice(emb);
        self.labels.push(label);

        assert_eq!(
            self.data.len(),
            self.labels.len() * dim,
            "reid: store rows and labels out of step"
        );
        Ok(())
    }
}
