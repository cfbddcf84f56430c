//! Core compute primitives (Matrix, `CsrMatrix`, Samples).
//!
//! These types provide the foundation for the clustering algorithms.

mod matrix;
mod samples;
mod sparse;

pub use matrix::Matrix;
pub use samples::Samples;
pub use sparse::{CsrMatrix, SparseRow};
