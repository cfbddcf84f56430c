//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use exemplar::prelude::*;
//! ```

pub use crate::cluster::{
    affinity_propagation, Affinity, AffinityPropagation, Preference, PropagationOptions,
};
pub use crate::metrics::pairwise::euclidean_distances;
pub use crate::metrics::silhouette_score;
pub use crate::primitives::{CsrMatrix, Matrix, Samples};
pub use crate::traits::UnsupervisedEstimator;
