//! Exemplar: Affinity Propagation clustering in pure Rust.
//!
//! Affinity Propagation selects exemplars, actual samples that stand for
//! their clusters, by passing responsibility and availability messages over
//! a similarity matrix. The number of clusters follows from the preferences
//! rather than being chosen up front.
//!
//! # Quick Start
//!
//! ```
//! use exemplar::prelude::*;
//!
//! // Two well-separated groups
//! let x = Matrix::from_vec(6, 2, vec![
//!     0.0, 0.0,
//!     0.1, 0.1,
//!     0.2, 0.0,
//!     10.0, 10.0,
//!     10.1, 10.1,
//!     10.0, 10.2,
//! ]).expect("valid matrix");
//!
//! let mut model = AffinityPropagation::new().with_random_state(0);
//! let labels = model.fit_predict(&x).expect("fit succeeds");
//!
//! assert_eq!(model.cluster_centers_indices(), &[1, 4]);
//! assert_eq!(labels, vec![0, 0, 0, 1, 1, 1]);
//! assert!(silhouette_score(&x, &labels) > 0.9);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Dense and CSR sparse matrices
//! - [`cluster`]: Affinity Propagation (procedure and estimator)
//! - [`metrics`]: Pairwise distances and the silhouette score
//! - [`warnings`]: Non-fatal diagnostics and their handlers
//! - [`traits`]: The unsupervised estimator contract
//! - [`error`]: Error type shared by every module

pub mod cluster;
pub mod error;
pub mod metrics;
pub mod prelude;
pub mod primitives;
pub mod traits;
pub mod warnings;

pub use error::{ExemplarError, Result};
pub use primitives::{CsrMatrix, Matrix, Samples};
pub use traits::UnsupervisedEstimator;
