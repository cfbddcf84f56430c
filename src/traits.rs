//! Core traits for clustering estimators.
//!
//! These traits define the API contract for all clustering algorithms.

use crate::error::Result;
use crate::primitives::Samples;

/// Trait for unsupervised learning models.
///
/// Inputs are anything convertible into [`Samples`]: `&Matrix<f32>` or
/// `&CsrMatrix<f32>`.
///
/// # Examples
///
/// ```
/// use exemplar::prelude::*;
///
/// // Two clear clusters
/// let data = Matrix::from_vec(6, 2, vec![
///     0.0, 0.0, 0.1, 0.1, 0.2, 0.0,  // Cluster 1
///     10.0, 10.0, 10.1, 10.1, 10.0, 10.2,  // Cluster 2
/// ]).expect("valid matrix");
///
/// let mut model = AffinityPropagation::new().with_random_state(42);
/// let labels = model.fit_predict(&data).expect("fit succeeds");
/// assert_eq!(labels.len(), 6);
/// assert_eq!(labels, model.predict(&data).expect("fitted"));
/// ```
pub trait UnsupervisedEstimator {
    /// The type of labels/clusters produced.
    type Labels: Clone;

    /// Fits the model to data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails (empty data, invalid parameters, etc.).
    fn fit<'a>(&mut self, x: impl Into<Samples<'a>>) -> Result<()>;

    /// Predicts cluster assignments for new data.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or the input does not
    /// match what the model was fitted on.
    fn predict<'a>(&self, x: impl Into<Samples<'a>>) -> Result<Self::Labels>;

    /// Labels assigned to the training data by the last `fit`.
    fn fitted_labels(&self) -> Option<&Self::Labels>;

    /// Fits the model and returns the training labels.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit_predict<'a>(&mut self, x: impl Into<Samples<'a>>) -> Result<Self::Labels> {
        self.fit(x)?;
        self.fitted_labels()
            .cloned()
            .ok_or_else(|| "fit completed without producing labels".into())
    }
}
