//! Compressed Sparse Row (CSR) matrix.
//!
//! Layout follows the usual CSR triplet:
//! - `indptr`: row offsets into `indices`/`data` (length = rows + 1)
//! - `indices`: column index of each stored value
//! - `data`: stored values, parallel to `indices`

use super::Matrix;
use serde::{Deserialize, Serialize};

/// A sparse matrix in CSR format.
///
/// # Examples
///
/// ```
/// use exemplar::primitives::CsrMatrix;
///
/// // [[0, 2], [3, 0]]
/// let m = CsrMatrix::new(2, 2, vec![0, 1, 2], vec![1, 0], vec![2.0, 3.0]).expect("valid CSR");
/// assert_eq!(m.nnz(), 2);
/// assert_eq!(m.to_dense().as_slice(), &[0.0, 2.0, 3.0, 0.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsrMatrix<T> {
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

/// Borrowed view of one CSR row.
#[derive(Debug, Clone, Copy)]
pub struct SparseRow<'a, T> {
    /// Column indices of the stored values.
    pub indices: &'a [usize],
    /// Stored values.
    pub values: &'a [T],
}

impl<T: Copy> CsrMatrix<T> {
    /// Builds a CSR matrix from its raw arrays.
    ///
    /// # Errors
    ///
    /// Returns an error if the arrays are inconsistent: `indptr` must have
    /// `rows + 1` non-decreasing entries ending at `data.len()`, and every
    /// column index must be below `cols`.
    pub fn new(
        rows: usize,
        cols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<T>,
    ) -> Result<Self, &'static str> {
        if indptr.len() != rows + 1 {
            return Err("indptr length must equal rows + 1");
        }
        if indices.len() != data.len() {
            return Err("indices and data must have the same length");
        }
        if indptr.first() != Some(&0) || indptr.last() != Some(&data.len()) {
            return Err("indptr must start at 0 and end at nnz");
        }
        if indptr.windows(2).any(|w| w[0] > w[1]) {
            return Err("indptr must be non-decreasing");
        }
        if indices.iter().any(|&c| c >= cols) {
            return Err("column index out of bounds");
        }
        Ok(Self {
            indptr,
            indices,
            data,
            rows,
            cols,
        })
    }

    /// Returns the shape as (rows, cols).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.cols
    }

    /// Number of stored values.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Returns the stored entries of a row.
    ///
    /// # Panics
    ///
    /// Panics if `row_idx` is out of bounds.
    #[must_use]
    pub fn row(&self, row_idx: usize) -> SparseRow<'_, T> {
        let (start, end) = (self.indptr[row_idx], self.indptr[row_idx + 1]);
        SparseRow {
            indices: &self.indices[start..end],
            values: &self.data[start..end],
        }
    }
}

impl CsrMatrix<f32> {
    /// An all-zero sparse matrix (no stored values).
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            indptr: vec![0; rows + 1],
            indices: Vec::new(),
            data: Vec::new(),
            rows,
            cols,
        }
    }

    /// Compresses a dense matrix, dropping exact zeros.
    #[must_use]
    pub fn from_dense(dense: &Matrix<f32>) -> Self {
        let (rows, cols) = dense.shape();
        let mut indptr = Vec::with_capacity(rows + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);
        for i in 0..rows {
            for (j, &v) in dense.row(i).iter().enumerate() {
                if v != 0.0 {
                    indices.push(j);
                    data.push(v);
                }
            }
            indptr.push(data.len());
        }
        Self {
            indptr,
            indices,
            data,
            rows,
            cols,
        }
    }

    /// Expands to a dense row-major matrix.
    #[must_use]
    pub fn to_dense(&self) -> Matrix<f32> {
        let mut dense = Matrix::zeros(self.rows, self.cols);
        for i in 0..self.rows {
            let row = self.row(i);
            for (&j, &v) in row.indices.iter().zip(row.values) {
                dense.set(i, j, dense.get(i, j) + v);
            }
        }
        dense
    }

    /// Writes row `row_idx` into `out` as dense values.
    ///
    /// # Panics
    ///
    /// Panics if `out` is shorter than the column count.
    pub fn row_dense_into(&self, row_idx: usize, out: &mut [f32]) {
        out[..self.cols].fill(0.0);
        let row = self.row(row_idx);
        for (&j, &v) in row.indices.iter().zip(row.values) {
            out[j] += v;
        }
    }
}
