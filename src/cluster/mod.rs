//! Clustering algorithms.
//!
//! Includes Affinity Propagation, which picks exemplars by message passing
//! over a similarity matrix instead of fixing the number of clusters.
//!
//! - [`affinity_propagation`]: the procedure on a similarity matrix
//! - [`AffinityPropagation`]: estimator over samples or precomputed
//!   similarities

mod affinity_propagation;
mod propagation;

pub use affinity_propagation::{Affinity, AffinityPropagation};
pub use propagation::{
    affinity_propagation, equal_similarities_and_preferences, Preference, Propagation,
    PropagationOptions,
};

#[cfg(test)]
mod test_fixtures;

#[cfg(test)]
mod tests;
