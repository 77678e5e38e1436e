//! Stable identity labels for a stream of appearance embeddings.
//!
//! Works with any fixed-size embedding (person re-identification, face,
//! voice, etc.). No ground-truth labels are needed: the same subject seen
//! across frames keeps the same label because its embeddings stay close.
//!
//! # Usage
//!
//! ```
//! use giztoy_reid::{Config, Matcher};
//!
//! let mut m = Matcher::empty(Config::default()).unwrap();
//!
//! assert_eq!(m.identify(&[1.0, 0.0, 0.0], true).unwrap(), 0);
//! // Close to the first subject: label reused.
//! assert_eq!(m.identify(&[0.99, 0.1, 0.0], true).unwrap(), 0);
//! // Dissimilar: new label.
//! assert_eq!(m.identify(&[0.0, 0.0, 1.0], true).unwrap(), 1);
//!
//! // Dry run: nothing is stored.
//! assert_eq!(m.identify(&[0.0, 1.0, 0.0], false).unwrap(), 2);
//! assert_eq!(m.len(), 3);
//! ```
//!
//! # Design
//!
//! Identity is decided once, at insertion time, and never revisited. There
//! is no re-clustering or merging: a committed label is permanent, which
//! keeps labels stable for downstream consumers.

mod config;
mod error;
mod matcher;
mod metric;
mod shared;
mod snapshot;
mod store;

pub use config::{Config, Thresholds};
pub use error::ReidError;
pub use matcher::{Decision, Matcher, Seed};
pub use metric::{cosine_similarity, euclidean_distance, Metric, COSINE_EPS};
pub use shared::SharedMatcher;
pub use snapshot::Snapshot;
pub use store::EmbeddingStore;
