//! Non-fatal diagnostics raised while clustering.
//!
//! A warning never aborts a call: the algorithm falls back to a
//! well-defined result and reports what happened through a
//! [`WarningHandler`]. The default handler logs through `tracing`;
//! [`CollectWarnings`] records warnings for later inspection.

use std::fmt;
use std::sync::Mutex;

/// Broad class of a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCategory {
    /// The iterative procedure did not reach a stable state.
    Convergence,
    /// Input-dependent condition the caller should know about.
    User,
}

impl fmt::Display for WarningCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Convergence => write!(f, "ConvergenceWarning"),
            Self::User => write!(f, "UserWarning"),
        }
    }
}

/// A warning raised by a clustering routine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterWarning {
    /// Iteration budget exhausted; exemplars exist but may be degenerate.
    DidNotConverge {
        /// Iterations run
        iterations: usize,
    },
    /// Iteration budget exhausted and no exemplar emerged.
    NoClusterCenters {
        /// Iterations run
        iterations: usize,
    },
    /// Every off-diagonal similarity and every preference is equal.
    EqualSimilarities,
    /// `predict` called on a model whose fit produced no exemplars.
    PredictWithoutCenters,
}

impl ClusterWarning {
    /// Category of this warning.
    #[must_use]
    pub fn category(&self) -> WarningCategory {
        match self {
            Self::DidNotConverge { .. }
            | Self::NoClusterCenters { .. }
            | Self::PredictWithoutCenters => WarningCategory::Convergence,
            Self::EqualSimilarities => WarningCategory::User,
        }
    }

    /// True for convergence warnings.
    #[must_use]
    pub fn is_convergence(&self) -> bool {
        self.category() == WarningCategory::Convergence
    }
}

impl fmt::Display for ClusterWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DidNotConverge { .. } => write!(
                f,
                "Affinity propagation did not converge, this model may return degenerate \
                 cluster centers and labels."
            ),
            Self::NoClusterCenters { .. } => write!(
                f,
                "Affinity propagation did not converge and this model will not have any \
                 cluster centers."
            ),
            Self::EqualSimilarities => write!(
                f,
                "All samples have mutually equal similarities. Returning arbitrary cluster \
                 center(s)."
            ),
            Self::PredictWithoutCenters => write!(
                f,
                "This model does not have any cluster centers because affinity propagation \
                 did not converge. Labeling every sample as '-1'."
            ),
        }
    }
}

/// Receives warnings as they are raised.
///
/// # Example
///
/// ```
/// use exemplar::warnings::{ClusterWarning, WarningHandler};
///
/// #[derive(Debug)]
/// struct Stderr;
///
/// impl WarningHandler for Stderr {
///     fn on_warning(&self, warning: &ClusterWarning) {
///         eprintln!("[{}] {}", warning.category(), warning);
///     }
/// }
/// ```
pub trait WarningHandler: Send + Sync + fmt::Debug {
    /// Called once per raised warning.
    fn on_warning(&self, warning: &ClusterWarning);
}

/// Default handler: forwards every warning to `tracing::warn!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogWarnings;

impl WarningHandler for LogWarnings {
    fn on_warning(&self, warning: &ClusterWarning) {
        tracing::warn!(category = %warning.category(), "{warning}");
    }
}

/// Handler that records warnings instead of logging them.
///
/// Share it through an `Arc` to inspect what an estimator raised.
#[derive(Debug, Default)]
pub struct CollectWarnings {
    warnings: Mutex<Vec<ClusterWarning>>,
}

impl CollectWarnings {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the collected warnings.
    #[must_use]
    pub fn warnings(&self) -> Vec<ClusterWarning> {
        self.warnings
            .lock()
            .map(|w| w.clone())
            .unwrap_or_default()
    }

    /// Number of collected convergence warnings.
    #[must_use]
    pub fn count_convergence(&self) -> usize {
        self.warnings()
            .iter()
            .filter(|w| w.is_convergence())
            .count()
    }

    /// True if any collected warning's message contains `needle`.
    #[must_use]
    pub fn any_message_contains(&self, needle: &str) -> bool {
        self.warnings()
            .iter()
            .any(|w| w.to_string().contains(needle))
    }

    /// Clear collected warnings.
    pub fn clear(&self) {
        if let Ok(mut w) = self.warnings.lock() {
            w.clear();
        }
    }
}

impl WarningHandler for CollectWarnings {
    fn on_warning(&self, warning: &ClusterWarning) {
        if let Ok(mut w) = self.warnings.lock() {
            w.push(warning.clone());
        }
    }
}
