//! Pairwise distances between sample rows.
//!
//! Both operands may be dense or CSR; sparse rows are expanded into a
//! scratch buffer one at a time so results are bit-identical to the
//! dense path.

use crate::error::{ExemplarError, Result};
use crate::primitives::{Matrix, Samples};

/// Squared Euclidean distance between two equal-length slices.
#[inline]
#[must_use]
pub fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - y) * (x - y))
        .sum()
}

fn check_features(x: &Samples<'_>, y: &Samples<'_>) -> Result<()> {
    if x.n_features() != y.n_features() {
        return Err(ExemplarError::DimensionMismatch {
            expected: format!("{} features", x.n_features()),
            actual: format!("{} features", y.n_features()),
        });
    }
    Ok(())
}

/// Densifies every row once so inner loops only touch slices.
fn dense_rows(x: &Samples<'_>) -> Vec<f32> {
    match x {
        Samples::Dense(m) => m.as_slice().to_vec(),
        Samples::Sparse(m) => m.to_dense().as_slice().to_vec(),
    }
}

/// Euclidean distance matrix between the rows of `x` and the rows of `y`.
///
/// Entry (i, j) is `||x_i - y_j||`, or its square when `squared` is set.
///
/// # Errors
///
/// Returns an error if `x` and `y` have different feature counts.
///
/// # Examples
///
/// ```
/// use exemplar::metrics::pairwise::euclidean_distances;
/// use exemplar::primitives::Matrix;
///
/// let x = Matrix::from_vec(2, 2, vec![0.0, 0.0, 3.0, 4.0]).expect("valid");
/// let d = euclidean_distances((&x).into(), (&x).into(), false).expect("same width");
/// assert!((d.get(0, 1) - 5.0).abs() < 1e-6);
/// assert_eq!(d.get(1, 1), 0.0);
/// ```
pub fn euclidean_distances(x: Samples<'_>, y: Samples<'_>, squared: bool) -> Result<Matrix<f32>> {
    check_features(&x, &y)?;
    let (n_x, n_features) = x.shape();
    let n_y = y.n_samples();

    let xs = dense_rows(&x);
    let ys = dense_rows(&y);

    let mut out = Vec::with_capacity(n_x * n_y);
    for i in 0..n_x {
        let a = &xs[i * n_features..(i + 1) * n_features];
        for j in 0..n_y {
            let b = &ys[j * n_features..(j + 1) * n_features];
            let d = squared_euclidean(a, b);
            out.push(if squared { d } else { d.sqrt() });
        }
    }

    Matrix::from_vec(n_x, n_y, out).map_err(ExemplarError::from)
}

/// Negative squared Euclidean distances of `x` with itself.
///
/// This is the similarity used by affinity propagation when the affinity
/// is not precomputed: the diagonal is zero and every other entry is
/// non-positive.
///
/// # Errors
///
/// Never fails for well-formed input; the `Result` mirrors
/// [`euclidean_distances`].
pub fn negative_squared_euclidean(x: Samples<'_>) -> Result<Matrix<f32>> {
    Ok(euclidean_distances(x, x, true)?.negated())
}

/// Index of the closest row of `centers` for every row of `x`.
///
/// Ties resolve to the lowest center index.
///
/// # Errors
///
/// Returns an error if `centers` is empty or the feature counts differ.
pub fn pairwise_distances_argmin(x: Samples<'_>, centers: &Matrix<f32>) -> Result<Vec<usize>> {
    let centers_view = Samples::from(centers);
    check_features(&x, &centers_view)?;
    if centers.n_rows() == 0 {
        return Err(ExemplarError::empty_input("centers"));
    }

    let n_features = x.n_features();
    let mut buf = vec![0.0_f32; n_features];
    let mut out = Vec::with_capacity(x.n_samples());

    for i in 0..x.n_samples() {
        x.row_dense_into(i, &mut buf);
        let mut best = 0;
        let mut best_dist = f32::INFINITY;
        for k in 0..centers.n_rows() {
            let d = squared_euclidean(&buf, centers.row(k));
            if d < best_dist {
                best_dist = d;
                best = k;
            }
        }
        out.push(best);
    }

    Ok(out)
}
