//! Affinity Propagation message passing.
//!
//! Exemplars emerge from two kinds of messages exchanged over a
//! similarity matrix S:
//!
//! - responsibility r(i,k): how well-suited k is to be the exemplar of i,
//!   relative to the other candidates for i
//! - availability a(i,k): how appropriate it would be for i to pick k,
//!   given the support k receives from other points
//!
//! Point k is an exemplar when `a(k,k) + r(k,k) > 0`. The run converges once
//! the exemplar set has been stable for `convergence_iter` iterations.
//!
//! Reference: Frey & Dueck (2007) "Clustering by Passing Messages Between
//! Data Points", Science 315.

use crate::error::{ExemplarError, Result};
use crate::primitives::Matrix;
use crate::warnings::ClusterWarning;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Self-similarity placed on the diagonal of S.
///
/// Larger preferences produce more exemplars.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Preference {
    /// Median of every entry of S (diagonal included).
    #[default]
    Median,
    /// Same preference for every sample.
    Scalar(f32),
    /// One preference per sample.
    PerSample(Vec<f32>),
}

impl Preference {
    /// Expands the preference to one value per sample of `s`.
    ///
    /// # Errors
    ///
    /// Returns an error if a per-sample preference has the wrong length or
    /// `s` is empty.
    pub fn resolve(&self, s: &Matrix<f32>) -> Result<Vec<f32>> {
        let n = s.n_rows();
        match self {
            Preference::Median => {
                let median = s
                    .median()
                    .ok_or_else(|| ExemplarError::empty_input("similarity matrix"))?;
                Ok(vec![median; n])
            }
            Preference::Scalar(p) => Ok(vec![*p; n]),
            Preference::PerSample(p) => {
                if p.len() != n {
                    return Err(ExemplarError::dimension_mismatch("preference", n, p.len()));
                }
                Ok(p.clone())
            }
        }
    }
}

impl From<f32> for Preference {
    fn from(p: f32) -> Self {
        Preference::Scalar(p)
    }
}

impl From<Vec<f32>> for Preference {
    fn from(p: Vec<f32>) -> Self {
        Preference::PerSample(p)
    }
}

/// Hyperparameters of [`affinity_propagation`].
///
/// # Examples
///
/// ```
/// use exemplar::cluster::{Preference, PropagationOptions};
///
/// let options = PropagationOptions::new()
///     .with_preference(-50.0)
///     .with_damping(0.7)
///     .with_random_state(0);
/// assert_eq!(options.preference(), &Preference::Scalar(-50.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropagationOptions {
    preference: Preference,
    damping: f32,
    max_iter: usize,
    convergence_iter: usize,
    copy: bool,
    verbose: bool,
    random_state: Option<u64>,
}

impl Default for PropagationOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl PropagationOptions {
    /// Default options: median preference, damping 0.5, 200 iterations,
    /// convergence window 15, copying input.
    #[must_use]
    pub fn new() -> Self {
        Self {
            preference: Preference::Median,
            damping: 0.5,
            max_iter: 200,
            convergence_iter: 15,
            copy: true,
            verbose: false,
            random_state: None,
        }
    }

    /// Sets the preference.
    #[must_use]
    pub fn with_preference(mut self, preference: impl Into<Preference>) -> Self {
        self.preference = preference.into();
        self
    }

    /// Sets the damping factor, in [0.5, 1.0).
    #[must_use]
    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the number of stable iterations required for convergence.
    #[must_use]
    pub fn with_convergence_iter(mut self, convergence_iter: usize) -> Self {
        self.convergence_iter = convergence_iter;
        self
    }

    /// When false, preferences are written onto the caller's diagonal.
    #[must_use]
    pub fn with_copy(mut self, copy: bool) -> Self {
        self.copy = copy;
        self
    }

    /// Reports convergence at info level instead of debug.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets the seed of the tie-breaking noise.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Returns the preference.
    #[must_use]
    pub fn preference(&self) -> &Preference {
        &self.preference
    }

    /// Returns the damping factor.
    #[must_use]
    pub fn damping(&self) -> f32 {
        self.damping
    }

    /// Returns the maximum number of iterations.
    #[must_use]
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Returns the convergence window.
    #[must_use]
    pub fn convergence_iter(&self) -> usize {
        self.convergence_iter
    }

    /// Returns the copy flag.
    #[must_use]
    pub fn copy(&self) -> bool {
        self.copy
    }

    /// Returns the verbose flag.
    #[must_use]
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Returns the random seed.
    #[must_use]
    pub fn random_state(&self) -> Option<u64> {
        self.random_state
    }

    /// Checks hyperparameter ranges.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHyperparameter` for damping outside [0.5, 1.0) or a
    /// zero iteration count.
    pub fn validate(&self) -> Result<()> {
        if !(0.5..1.0).contains(&self.damping) {
            return Err(ExemplarError::invalid_hyperparameter(
                "damping",
                self.damping,
                "value in [0.5, 1.0)",
            ));
        }
        if self.max_iter == 0 {
            return Err(ExemplarError::invalid_hyperparameter(
                "max_iter",
                self.max_iter,
                ">= 1",
            ));
        }
        if self.convergence_iter == 0 {
            return Err(ExemplarError::invalid_hyperparameter(
                "convergence_iter",
                self.convergence_iter,
                ">= 1",
            ));
        }
        Ok(())
    }
}

/// Outcome of [`affinity_propagation`].
#[derive(Debug, Clone, PartialEq)]
pub struct Propagation {
    /// Exemplar indices, ascending. Empty when no exemplar emerged.
    pub cluster_centers_indices: Vec<usize>,
    /// Cluster of each sample in `0..K`, or -1 for every sample when
    /// there are no exemplars.
    pub labels: Vec<i32>,
    /// Iterations run (0 when the degenerate rule short-circuits).
    pub n_iter: usize,
    /// Whether the exemplar set stabilized within `max_iter`.
    pub converged: bool,
    /// Warnings raised during the run. Callers decide how to surface them.
    pub warnings: Vec<ClusterWarning>,
}

impl Propagation {
    /// Number of clusters found.
    #[must_use]
    pub fn n_clusters(&self) -> usize {
        self.cluster_centers_indices.len()
    }
}

/// True when every off-diagonal entry of `s` is equal and every preference
/// is equal.
///
/// In that case message passing has nothing to break ties with, and
/// [`affinity_propagation`] returns a fixed assignment instead.
///
/// # Examples
///
/// ```
/// use exemplar::cluster::equal_similarities_and_preferences;
/// use exemplar::primitives::Matrix;
///
/// let s = Matrix::from_vec(2, 2, vec![0.0, -2.0, -2.0, 0.0]).expect("valid");
/// assert!(equal_similarities_and_preferences(&s, &[0.0, 0.0]));
/// assert!(!equal_similarities_and_preferences(&s, &[0.0, 1.0]));
/// ```
#[must_use]
pub fn equal_similarities_and_preferences(s: &Matrix<f32>, preferences: &[f32]) -> bool {
    let all_equal_preferences = preferences.windows(2).all(|w| w[0] == w[1]);
    if !all_equal_preferences {
        return false;
    }

    let n = s.n_rows();
    let mut off_diagonal = (0..n)
        .flat_map(|i| (0..s.n_cols()).map(move |j| (i, j)))
        .filter(|&(i, j)| i != j)
        .map(|(i, j)| s.get(i, j));

    match off_diagonal.next() {
        Some(first) => off_diagonal.all(|v| v == first),
        None => true,
    }
}

/// Runs Affinity Propagation on a similarity matrix.
///
/// With `copy` set (the default) `s` is left untouched. Otherwise the
/// preferences are written onto its diagonal and nothing else changes;
/// clustering is identical either way for the same random state.
///
/// Non-convergence and equal similarities are not errors: they are
/// returned in [`Propagation::warnings`] for the caller to surface.
///
/// # Errors
///
/// Returns an error if `s` is empty or not square, a hyperparameter is out
/// of range, or a per-sample preference has the wrong length.
///
/// # Examples
///
/// ```
/// use exemplar::cluster::{affinity_propagation, PropagationOptions};
/// use exemplar::metrics::pairwise::negative_squared_euclidean;
/// use exemplar::primitives::Matrix;
///
/// let x = Matrix::from_vec(6, 2, vec![
///     0.0, 0.0, 0.1, 0.1, 0.2, 0.0,
///     10.0, 10.0, 10.1, 10.1, 10.0, 10.2,
/// ]).expect("valid");
/// let mut s = negative_squared_euclidean((&x).into()).expect("distances");
///
/// let result = affinity_propagation(&mut s, &PropagationOptions::new().with_random_state(0))
///     .expect("square input");
/// assert_eq!(result.cluster_centers_indices, vec![1, 4]);
/// assert_eq!(result.labels, vec![0, 0, 0, 1, 1, 1]);
/// ```
pub fn affinity_propagation(
    s: &mut Matrix<f32>,
    options: &PropagationOptions,
) -> Result<Propagation> {
    let (n_rows, n_cols) = s.shape();
    if n_rows != n_cols {
        return Err(ExemplarError::NotSquare {
            rows: n_rows,
            cols: n_cols,
        });
    }
    if n_rows == 0 {
        return Err(ExemplarError::empty_input("similarity matrix"));
    }
    options.validate()?;
    let preferences = options.preference.resolve(s)?;
    let n = n_rows;

    if n == 1 || equal_similarities_and_preferences(s, &preferences) {
        let warning = ClusterWarning::EqualSimilarities;
        tracing::debug!(category = %warning.category(), "{warning}");
        // S[0, n-1] is the common off-diagonal similarity (or the lone entry).
        let (cluster_centers_indices, labels) = if preferences[0] > s.get(0, n - 1) {
            ((0..n).collect(), (0..n as i32).collect())
        } else {
            (vec![0], vec![0; n])
        };
        return Ok(Propagation {
            cluster_centers_indices,
            labels,
            n_iter: 0,
            converged: true,
            warnings: vec![warning],
        });
    }

    if !options.copy {
        s.set_diagonal(&preferences);
    }

    let mut similarity: Vec<f64> = s.as_slice().iter().map(|&v| f64::from(v)).collect();
    for (i, &p) in preferences.iter().enumerate() {
        similarity[i * n + i] = f64::from(p);
    }

    let mut rng = match options.random_state {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    remove_degeneracies(&mut similarity, &mut rng);

    let mut messages = Messages::new(n, f64::from(options.damping));
    let window = options.convergence_iter;
    let mut history = vec![false; n * window];
    let mut exemplars = vec![false; n];
    let mut converged = false;
    let mut iterations = 0;

    for it in 0..options.max_iter {
        iterations = it + 1;
        messages.update_responsibilities(&similarity);
        messages.update_availabilities();

        for (i, is_exemplar) in exemplars.iter_mut().enumerate() {
            *is_exemplar = messages.is_exemplar(i);
            history[i * window + it % window] = *is_exemplar;
        }

        if it >= window {
            let stable = (0..n).all(|i| {
                let count = history[i * window..(i + 1) * window]
                    .iter()
                    .filter(|&&e| e)
                    .count();
                count == 0 || count == window
            });
            if stable && exemplars.iter().any(|&e| e) {
                converged = true;
                break;
            }
        }
    }

    if options.verbose {
        if converged {
            tracing::info!(iterations, "Converged after {iterations} iterations.");
        } else {
            tracing::info!(iterations, "Did not converge");
        }
    } else {
        tracing::debug!(iterations, converged, n_samples = n, "affinity propagation finished");
    }

    let exemplar_indices: Vec<usize> = (0..n).filter(|&i| exemplars[i]).collect();
    let mut warnings = Vec::new();

    if exemplar_indices.is_empty() {
        let warning = ClusterWarning::NoClusterCenters { iterations };
        tracing::debug!(category = %warning.category(), "{warning}");
        warnings.push(warning);
        return Ok(Propagation {
            cluster_centers_indices: Vec::new(),
            labels: vec![-1; n],
            n_iter: iterations,
            converged,
            warnings,
        });
    }

    if !converged {
        let warning = ClusterWarning::DidNotConverge { iterations };
        tracing::debug!(category = %warning.category(), "{warning}");
        warnings.push(warning);
    }

    let (cluster_centers_indices, labels) = assign_clusters(&similarity, n, exemplar_indices);

    Ok(Propagation {
        cluster_centers_indices,
        labels,
        n_iter: iterations,
        converged,
        warnings,
    })
}

/// Adds `(eps * s + tiny * 100) * N(0, 1)` to every entry so that exact
/// ties cannot make the messages oscillate.
fn remove_degeneracies(similarity: &mut [f64], rng: &mut impl Rng) {
    let scale_floor = f64::MIN_POSITIVE * 100.0;
    for v in similarity.iter_mut() {
        *v += (f64::EPSILON * *v + scale_floor) * standard_normal(rng);
    }
}

/// Sample standard normal using Box-Muller transform
fn standard_normal(rng: &mut impl Rng) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-300);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Index of the first maximum of `values`.
fn argmax(values: impl Iterator<Item = f64>) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (k, v) in values.enumerate() {
        if v > best_value || k == 0 {
            best = k;
            best_value = v;
        }
    }
    best
}

/// Responsibility and availability matrices (row-major, n × n).
struct Messages {
    n: usize,
    damping: f64,
    responsibility: Vec<f64>,
    availability: Vec<f64>,
    scratch: Vec<f64>,
}

impl Messages {
    fn new(n: usize, damping: f64) -> Self {
        Self {
            n,
            damping,
            responsibility: vec![0.0; n * n],
            availability: vec![0.0; n * n],
            scratch: vec![0.0; n],
        }
    }

    /// r(i,k) <- s(i,k) - max_{k' != k} (a(i,k') + s(i,k')), damped.
    fn update_responsibilities(&mut self, similarity: &[f64]) {
        let n = self.n;
        for i in 0..n {
            let row = i * n..(i + 1) * n;
            let s_row = &similarity[row.clone()];
            let a_row = &self.availability[row.clone()];

            let best = argmax((0..n).map(|k| a_row[k] + s_row[k]));
            let first = a_row[best] + s_row[best];
            let second = (0..n)
                .filter(|&k| k != best)
                .map(|k| a_row[k] + s_row[k])
                .fold(f64::NEG_INFINITY, f64::max);

            let r_row = &mut self.responsibility[row];
            for k in 0..n {
                let competitor = if k == best { second } else { first };
                let update = s_row[k] - competitor;
                r_row[k] = self.damping * r_row[k] + (1.0 - self.damping) * update;
            }
        }
    }

    /// a(i,k) <- min(0, r(k,k) + sum_{i' not in {i,k}} max(0, r(i',k))),
    /// a(k,k) <- sum_{i' != k} max(0, r(i',k)), damped.
    fn update_availabilities(&mut self) {
        let n = self.n;
        for k in 0..n {
            for i in 0..n {
                let r = self.responsibility[i * n + k];
                self.scratch[i] = if i == k { r } else { r.max(0.0) };
            }
            let column_sum: f64 = self.scratch.iter().sum();

            for i in 0..n {
                let mut update = column_sum - self.scratch[i];
                if i != k {
                    update = update.min(0.0);
                }
                let a = &mut self.availability[i * n + k];
                *a = self.damping * *a + (1.0 - self.damping) * update;
            }
        }
    }

    fn is_exemplar(&self, i: usize) -> bool {
        let d = i * self.n + i;
        self.availability[d] + self.responsibility[d] > 0.0
    }
}

/// Assigns every sample to an exemplar, refines each cluster's exemplar to
/// its most central member, and compacts labels to `0..K` in ascending
/// exemplar order.
fn assign_clusters(similarity: &[f64], n: usize, mut exemplars: Vec<usize>) -> (Vec<usize>, Vec<i32>) {
    let nearest = |exemplars: &[usize]| -> Vec<usize> {
        let mut c: Vec<usize> = (0..n)
            .map(|i| argmax(exemplars.iter().map(|&e| similarity[i * n + e])))
            .collect();
        for (k, &e) in exemplars.iter().enumerate() {
            c[e] = k;
        }
        c
    };

    let c = nearest(&exemplars);
    for (k, exemplar) in exemplars.iter_mut().enumerate() {
        let members: Vec<usize> = (0..n).filter(|&i| c[i] == k).collect();
        let best = argmax(
            members
                .iter()
                .map(|&j| members.iter().map(|&i| similarity[i * n + j]).sum::<f64>()),
        );
        *exemplar = members[best];
    }

    let c = nearest(&exemplars);
    let assigned: Vec<usize> = c.iter().map(|&k| exemplars[k]).collect();

    let mut centers = assigned.clone();
    centers.sort_unstable();
    centers.dedup();

    let labels = assigned
        .iter()
        .map(|e| centers.binary_search(e).map_or(-1, |pos| pos as i32))
        .collect();

    (centers, labels)
}


#[cfg(test)]
#[path = "tests_propagation_contract.rs"]
mod tests_propagation_contract;
