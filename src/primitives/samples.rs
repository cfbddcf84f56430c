//! Dense-or-sparse view over a sample matrix.

use super::{CsrMatrix, Matrix};

/// Borrowed input samples, one row per sample.
///
/// Estimators accept anything convertible into `Samples`, so both
/// `&Matrix<f32>` and `&CsrMatrix<f32>` can be passed directly.
///
/// # Examples
///
/// ```
/// use exemplar::primitives::{CsrMatrix, Matrix, Samples};
///
/// let dense = Matrix::from_vec(2, 2, vec![1.0, 0.0, 0.0, 2.0]).expect("valid");
/// let sparse = CsrMatrix::from_dense(&dense);
///
/// let a: Samples<'_> = (&dense).into();
/// let b: Samples<'_> = (&sparse).into();
/// assert!(!a.is_sparse());
/// assert!(b.is_sparse());
/// assert_eq!(a.shape(), b.shape());
/// ```
#[derive(Debug, Clone, Copy)]
pub enum Samples<'a> {
    /// Row-major dense matrix.
    Dense(&'a Matrix<f32>),
    /// Compressed sparse row matrix.
    Sparse(&'a CsrMatrix<f32>),
}

impl<'a> Samples<'a> {
    /// Returns (`n_samples`, `n_features`).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Samples::Dense(m) => m.shape(),
            Samples::Sparse(m) => m.shape(),
        }
    }

    /// Number of samples (rows).
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.shape().0
    }

    /// Number of features (columns).
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.shape().1
    }

    /// True for CSR input.
    #[must_use]
    pub fn is_sparse(&self) -> bool {
        matches!(self, Samples::Sparse(_))
    }

    /// Returns the dense matrix, or `None` for sparse input.
    #[must_use]
    pub fn as_dense(&self) -> Option<&'a Matrix<f32>> {
        match *self {
            Samples::Dense(m) => Some(m),
            Samples::Sparse(_) => None,
        }
    }

    /// Writes row `i` into `out` as dense values.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds or `out` is shorter than the feature count.
    pub fn row_dense_into(&self, i: usize, out: &mut [f32]) {
        match self {
            Samples::Dense(m) => out[..m.n_cols()].copy_from_slice(m.row(i)),
            Samples::Sparse(m) => m.row_dense_into(i, out),
        }
    }

    /// Copies the samples into an owned dense matrix.
    #[must_use]
    pub fn to_dense(&self) -> Matrix<f32> {
        match self {
            Samples::Dense(m) => (*m).clone(),
            Samples::Sparse(m) => m.to_dense(),
        }
    }

    /// Gathers the given rows into an owned dense matrix.
    #[must_use]
    pub fn select_rows_dense(&self, indices: &[usize]) -> Matrix<f32> {
        match self {
            Samples::Dense(m) => m.select_rows(indices),
            Samples::Sparse(m) => {
                let mut out = Matrix::zeros(indices.len(), m.n_cols());
                for (k, &i) in indices.iter().enumerate() {
                    let row = m.row(i);
                    for (&j, &v) in row.indices.iter().zip(row.values) {
                        out.set(k, j, out.get(k, j) + v);
                    }
                }
                out
            }
        }
    }
}

impl<'a> From<&'a Matrix<f32>> for Samples<'a> {
    fn from(m: &'a Matrix<f32>) -> Self {
        Samples::Dense(m)
    }
}

impl<'a> From<&'a CsrMatrix<f32>> for Samples<'a> {
    fn from(m: &'a CsrMatrix<f32>) -> Self {
        Samples::Sparse(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dense() -> Matrix<f32> {
        Matrix::from_vec(3, 2, vec![1.0, 0.0, 0.0, 2.0, 3.0, 4.0]).expect("valid")
    }

    #[test]
    fn test_shape_matches_for_both_layouts() {
        let d = dense();
        let s = CsrMatrix::from_dense(&d);
        assert_eq!(Samples::from(&d).shape(), (3, 2));
        assert_eq!(Samples::from(&s).shape(), (3, 2));
        assert_eq!(Samples::from(&s).n_features(), 2);
    }

    #[test]
    fn test_row_dense_into_agrees() {
        let d = dense();
        let s = CsrMatrix::from_dense(&d);
        let mut a = vec![0.0; 2];
        let mut b = vec![0.0; 2];
        for i in 0..3 {
            Samples::from(&d).row_dense_into(i, &mut a);
            Samples::from(&s).row_dense_into(i, &mut b);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_select_rows_dense_from_sparse() {
        let d = dense();
        let s = CsrMatrix::from_dense(&d);
        let picked = Samples::from(&s).select_rows_dense(&[2, 0]);
        assert_eq!(picked, d.select_rows(&[2, 0]));
    }

    #[test]
    fn test_as_dense() {
        let d = dense();
        let s = CsrMatrix::from_dense(&d);
        assert!(Samples::from(&d).as_dense().is_some());
        assert!(Samples::from(&s).as_dense().is_none());
        assert_eq!(Samples::from(&s).to_dense(), d);
    }
}
