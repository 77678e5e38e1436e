use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::ReidError;
use crate::matcher::{Decision, Matcher};
use crate::metric::Metric;
use crate::snapshot::Snapshot;

/// Thread-safe handle to a [`Matcher`].
///
/// Committing calls hold the write lock across the whole
/// score-decide-append sequence, so two concurrent commits can never both
/// mint an identity from the same view of the store. Dry runs and scoring
/// share the read lock and always see a complete store.
///
/// Cloning yields another handle to the same matcher.
#[derive(Debug, Clone)]
pub struct SharedMatcher {
    inner: Arc<RwLock<Matcher>>,
}

impl SharedMatcher {
    pub fn new(matcher: Matcher) -> Self {
        Self {
            inner: Arc::new(RwLock::new(matcher)),
        }
    }

    /// See [`Matcher::identify`].
    pub fn identify(&self, target: &[f32], commit: bool) -> Result<u64, ReidError> {
        self.identify_detailed(target, commit).map(|d| d.label)
    }

    /// See [`Matcher::identify_detailed`].
    pub fn identify_detailed(&self, target: &[f32], commit: bool) -> Result<Decision, ReidError> {
        if commit {
            self.inner.write().identify_detailed(target, true)
        } else {
            self.inner.read().decide(target)
        }
    }

    /// See [`Matcher::score`].
    pub fn score(&self, target: &[f32], metric: Metric) -> Result<Vec<f32>, ReidError> {
        self.inner.read().score(target, metric)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn next_id(&self) -> u64 {
        self.inner.read().next_id()
    }

    /// Captures the current store under the read lock.
    pub fn snapshot(&self) -> Snapshot {
        self.inner.read().snapshot()
    }

    /// Returns the matcher if this is the last handle, or `self` otherwise.
    pub fn into_inner(self) -> Result<Matcher, Self> {
        Arc::try_unwrap(self.inner)
            .map(|lock| lock.into_inner())
            .map_err(|inner| Self { inner })
    }
}

impl From<Matcher> for SharedMatcher {
    fn from(matcher: Matcher) -> Self {
        Self::new(matcher)
    }
}
