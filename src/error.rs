//! Error types for exemplar operations.
//!
//! Validation failures are fatal to the call that hit them. Non-fatal
//! conditions (non-convergence, degenerate similarities) are reported as
//! [`ClusterWarning`](crate::warnings::ClusterWarning)s instead.

use std::fmt;

/// Main error type for exemplar operations.
///
/// # Examples
///
/// ```
/// use exemplar::error::ExemplarError;
///
/// let err = ExemplarError::NotSquare { rows: 60, cols: 59 };
/// assert!(err.to_string().contains("S must be a square array"));
/// ```
#[derive(Debug)]
pub enum ExemplarError {
    /// Matrix/vector dimensions don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Similarity matrix is not square.
    NotSquare {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },

    /// A sparse matrix was passed where dense data is required.
    SparseNotSupported,

    /// Input feature count differs from the one seen during fit.
    FeatureMismatch {
        /// Name of the estimator
        estimator: &'static str,
        /// Features in the input
        found: usize,
        /// Features seen during fit
        expected: usize,
    },

    /// Estimator used before `fit` was called.
    NotFitted {
        /// Name of the estimator
        estimator: &'static str,
    },

    /// Operation not supported by the estimator's configuration.
    Unsupported {
        /// Reason the operation is rejected
        message: String,
    },

    /// Invalid hyperparameter value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Input has no samples.
    EmptyInput {
        /// What was empty
        context: String,
    },

    /// I/O error (file not found, permission denied, etc.).
    Io(std::io::Error),

    /// Serialization/deserialization error.
    Serialization(String),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for ExemplarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExemplarError::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "Matrix dimension mismatch: expected {expected}, got {actual}"
                )
            }
            ExemplarError::NotSquare { rows, cols } => {
                write!(f, "S must be a square array (shape=({rows}, {cols}))")
            }
            ExemplarError::SparseNotSupported => {
                write!(
                    f,
                    "A sparse matrix was passed, but dense data is required. \
                     Use to_dense() to convert to a dense matrix."
                )
            }
            ExemplarError::FeatureMismatch {
                estimator,
                found,
                expected,
            } => {
                write!(
                    f,
                    "X has {found} features, but {estimator} is expecting {expected} features as input."
                )
            }
            ExemplarError::NotFitted { estimator } => {
                write!(
                    f,
                    "This {estimator} instance is not fitted yet. Call 'fit' with appropriate \
                     arguments before using this estimator."
                )
            }
            ExemplarError::Unsupported { message } => write!(f, "{message}"),
            ExemplarError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            ExemplarError::EmptyInput { context } => write!(f, "empty input: {context}"),
            ExemplarError::Io(e) => write!(f, "I/O error: {e}"),
            ExemplarError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            ExemplarError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ExemplarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExemplarError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ExemplarError {
    fn from(err: std::io::Error) -> Self {
        ExemplarError::Io(err)
    }
}

impl From<bincode::Error> for ExemplarError {
    fn from(err: bincode::Error) -> Self {
        ExemplarError::Serialization(err.to_string())
    }
}

impl From<&str> for ExemplarError {
    fn from(msg: &str) -> Self {
        ExemplarError::Other(msg.to_string())
    }
}

impl ExemplarError {
    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an empty input error
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::EmptyInput {
            context: context.to_string(),
        }
    }

    /// Create an invalid hyperparameter error
    #[must_use]
    pub fn invalid_hyperparameter(param: &str, value: impl fmt::Display, constraint: &str) -> Self {
        Self::InvalidHyperparameter {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, ExemplarError>;
