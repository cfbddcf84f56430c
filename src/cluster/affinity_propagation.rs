//! Affinity Propagation estimator.
//!
//! Wraps [`affinity_propagation`] behind the
//! [`UnsupervisedEstimator`] contract: similarities are either computed
//! from samples (negative squared Euclidean distance) or supplied directly.

use super::propagation::{affinity_propagation, Preference, PropagationOptions};
use crate::error::{ExemplarError, Result};
use crate::metrics::pairwise::{negative_squared_euclidean, pairwise_distances_argmin};
use crate::primitives::{Matrix, Samples};
use crate::traits::UnsupervisedEstimator;
use crate::warnings::{ClusterWarning, LogWarnings, WarningHandler};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

const ESTIMATOR: &str = "AffinityPropagation";

/// How similarities are obtained from the input of `fit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Affinity {
    /// Negative squared Euclidean distance between samples.
    #[default]
    Euclidean,
    /// The input is the similarity matrix itself.
    Precomputed,
}

fn default_handler() -> Arc<dyn WarningHandler> {
    Arc::new(LogWarnings)
}

/// Affinity Propagation clustering.
///
/// Finds exemplars, members of the input that are representative of
/// clusters, by exchanging messages between pairs of samples until the
/// set of exemplars stops changing. The number of clusters is not fixed in
/// advance; it follows from the preferences.
///
/// # Algorithm
///
/// 1. Build the similarity matrix S (or take it as given)
/// 2. Place preferences on the diagonal of S
/// 3. Alternate responsibility and availability updates, damped
/// 4. Stop when exemplars are stable for `convergence_iter` iterations
/// 5. Assign each sample to its most similar exemplar
///
/// # Examples
///
/// ```
/// use exemplar::prelude::*;
///
/// let data = Matrix::from_vec(6, 2, vec![
///     1.0, 2.0,
///     1.1, 2.1,
///     0.9, 1.9,
///     8.0, 8.0,
///     8.1, 8.2,
///     7.9, 8.1,
/// ]).expect("Valid matrix dimensions and data length");
///
/// let mut model = AffinityPropagation::new().with_random_state(0);
/// model.fit(&data).expect("Fit succeeds with valid data");
///
/// assert_eq!(model.cluster_centers_indices().len(), 2);
/// let labels = model.predict(&data).expect("model is fitted");
/// assert_eq!(labels[0], labels[1]);
/// assert_ne!(labels[0], labels[3]);
/// ```
///
/// # Performance
///
/// - Time complexity: O(n²·i) where n=samples, i=iterations
/// - Space complexity: O(n²)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffinityPropagation {
    /// Damping, preference, iteration limits and seed.
    options: PropagationOptions,
    /// Source of the similarity matrix.
    affinity: Affinity,
    /// Receives non-fatal warnings; not persisted.
    #[serde(skip, default = "default_handler")]
    warning_handler: Arc<dyn WarningHandler>,
    /// Exemplar indices after fitting.
    cluster_centers_indices: Option<Vec<usize>>,
    /// Exemplar rows (feature space) after fitting; unset for precomputed.
    cluster_centers: Option<Matrix<f32>>,
    /// Labels for training data.
    labels: Option<Vec<i32>>,
    /// Similarity matrix used by the last fit.
    affinity_matrix: Option<Matrix<f32>>,
    /// Number of iterations run.
    n_iter: usize,
    /// Feature count seen during fit.
    n_features_in: usize,
}

impl Default for AffinityPropagation {
    fn default() -> Self {
        Self::new()
    }
}

impl AffinityPropagation {
    /// Creates an estimator with default hyperparameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: PropagationOptions::new(),
            affinity: Affinity::Euclidean,
            warning_handler: default_handler(),
            cluster_centers_indices: None,
            cluster_centers: None,
            labels: None,
            affinity_matrix: None,
            n_iter: 0,
            n_features_in: 0,
        }
    }

    /// Sets the damping factor, in [0.5, 1.0).
    #[must_use]
    pub fn with_damping(mut self, damping: f32) -> Self {
        self.options = self.options.with_damping(damping);
        self
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.options = self.options.with_max_iter(max_iter);
        self
    }

    /// Sets the number of stable iterations required for convergence.
    #[must_use]
    pub fn with_convergence_iter(mut self, convergence_iter: usize) -> Self {
        self.options = self.options.with_convergence_iter(convergence_iter);
        self
    }

    /// When false, the stored affinity matrix carries the preferences on
    /// its diagonal.
    #[must_use]
    pub fn with_copy(mut self, copy: bool) -> Self {
        self.options = self.options.with_copy(copy);
        self
    }

    /// Sets one preference for every sample.
    #[must_use]
    pub fn with_preference(mut self, preference: f32) -> Self {
        self.options = self.options.with_preference(preference);
        self
    }

    /// Sets one preference per sample.
    #[must_use]
    pub fn with_preferences(mut self, preferences: Vec<f32>) -> Self {
        self.options = self.options.with_preference(preferences);
        self
    }

    /// Sets how similarities are obtained.
    #[must_use]
    pub fn with_affinity(mut self, affinity: Affinity) -> Self {
        self.affinity = affinity;
        self
    }

    /// Reports convergence at info level.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.options = self.options.with_verbose(verbose);
        self
    }

    /// Sets the random seed for reproducibility.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.options = self.options.with_random_state(seed);
        self
    }

    /// Routes warnings to `handler` instead of the log.
    #[must_use]
    pub fn with_warning_handler(mut self, handler: Arc<dyn WarningHandler>) -> Self {
        self.warning_handler = handler;
        self
    }

    /// Returns the propagation options.
    #[must_use]
    pub fn options(&self) -> &PropagationOptions {
        &self.options
    }

    /// Returns the damping factor.
    #[must_use]
    pub fn damping(&self) -> f32 {
        self.options.damping()
    }

    /// Returns the maximum number of iterations.
    #[must_use]
    pub fn max_iter(&self) -> usize {
        self.options.max_iter()
    }

    /// Returns the convergence window.
    #[must_use]
    pub fn convergence_iter(&self) -> usize {
        self.options.convergence_iter()
    }

    /// Returns the preference setting.
    #[must_use]
    pub fn preference(&self) -> &Preference {
        self.options.preference()
    }

    /// Returns the affinity mode.
    #[must_use]
    pub fn affinity(&self) -> Affinity {
        self.affinity
    }

    /// Returns the random seed.
    #[must_use]
    pub fn random_state(&self) -> Option<u64> {
        self.options.random_state()
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.labels.is_some()
    }

    /// Returns the exemplar indices (empty if the fit did not converge).
    ///
    /// # Panics
    ///
    /// Panics if the model has not been fitted.
    #[must_use]
    pub fn cluster_centers_indices(&self) -> &[usize] {
        self.cluster_centers_indices
            .as_deref()
            .expect("Model not fitted. Call fit() first.")
    }

    /// Returns the exemplar rows, or `None` for a precomputed affinity or an
    /// unfitted model.
    #[must_use]
    pub fn cluster_centers(&self) -> Option<&Matrix<f32>> {
        self.cluster_centers.as_ref()
    }

    /// Returns the training labels (-1 when no exemplar emerged).
    ///
    /// # Panics
    ///
    /// Panics if the model has not been fitted.
    #[must_use]
    pub fn labels(&self) -> &[i32] {
        self.labels
            .as_deref()
            .expect("Model not fitted. Call fit() first.")
    }

    /// Returns the similarity matrix used by the last fit.
    #[must_use]
    pub fn affinity_matrix(&self) -> Option<&Matrix<f32>> {
        self.affinity_matrix.as_ref()
    }

    /// Returns the number of iterations run by the last fit.
    #[must_use]
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Returns the feature count seen during fit.
    #[must_use]
    pub fn n_features_in(&self) -> usize {
        self.n_features_in
    }

    /// Saves the model to a binary file using bincode.
    ///
    /// The warning handler is not saved; a loaded model logs warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self)?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Loads a model from a binary file.
    ///
    /// # Errors
    ///
    /// Returns an error if file reading or deserialization fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path)?;
        Ok(bincode::deserialize(&bytes)?)
    }

    fn warn(&self, warning: &ClusterWarning) {
        self.warning_handler.on_warning(warning);
    }

    /// Builds the similarity matrix for `x` according to the affinity mode.
    fn similarities(&self, x: Samples<'_>) -> Result<Matrix<f32>> {
        match self.affinity {
            Affinity::Precomputed => {
                let s = x.as_dense().ok_or(ExemplarError::SparseNotSupported)?;
                Ok(s.clone())
            }
            Affinity::Euclidean => negative_squared_euclidean(x),
        }
    }
}

impl UnsupervisedEstimator for AffinityPropagation {
    type Labels = Vec<i32>;

    /// Fits the model to samples or to a precomputed similarity matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Data is empty
    /// - A sparse matrix is passed with a precomputed affinity
    /// - The precomputed matrix is not square
    /// - A hyperparameter is out of range
    fn fit<'a>(&mut self, x: impl Into<Samples<'a>>) -> Result<()> {
        let x = x.into();
        let (n_samples, n_features) = x.shape();
        if n_samples == 0 {
            return Err(ExemplarError::empty_input("training data"));
        }

        let mut s = self.similarities(x)?;
        let outcome = affinity_propagation(&mut s, &self.options)?;

        for warning in &outcome.warnings {
            self.warn(warning);
        }

        self.cluster_centers = match self.affinity {
            Affinity::Euclidean => Some(x.select_rows_dense(&outcome.cluster_centers_indices)),
            Affinity::Precomputed => None,
        };
        self.cluster_centers_indices = Some(outcome.cluster_centers_indices);
        self.labels = Some(outcome.labels);
        self.affinity_matrix = Some(s);
        self.n_iter = outcome.n_iter;
        self.n_features_in = n_features;

        Ok(())
    }

    /// Assigns each sample to its nearest exemplar.
    ///
    /// If the fit produced no exemplars, every sample is labeled -1 and a
    /// convergence warning is raised.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted, the feature count
    /// differs from the fit, or the affinity is precomputed.
    fn predict<'a>(&self, x: impl Into<Samples<'a>>) -> Result<Vec<i32>> {
        let x = x.into();
        if !self.is_fitted() {
            return Err(ExemplarError::NotFitted {
                estimator: ESTIMATOR,
            });
        }
        if x.n_features() != self.n_features_in {
            return Err(ExemplarError::FeatureMismatch {
                estimator: ESTIMATOR,
                found: x.n_features(),
                expected: self.n_features_in,
            });
        }

        let centers = self
            .cluster_centers
            .as_ref()
            .ok_or_else(|| ExemplarError::Unsupported {
                message: "Predict method is not supported when affinity='precomputed'."
                    .to_string(),
            })?;

        if centers.n_rows() == 0 {
            self.warn(&ClusterWarning::PredictWithoutCenters);
            return Ok(vec![-1; x.n_samples()]);
        }

        Ok(pairwise_distances_argmin(x, centers)?
            .into_iter()
            .map(|k| k as i32)
            .collect())
    }

    fn fitted_labels(&self) -> Option<&Vec<i32>> {
        self.labels.as_ref()
    }
}

#[cfg(test)]
#[path = "tests_affinity_propagation_contract.rs"]
mod tests_affinity_propagation_contract;
