//! Tests for clustering algorithms.

use crate::cluster::*;
use crate::error::ExemplarError;
use crate::primitives::{CsrMatrix, Matrix};
use crate::traits::UnsupervisedEstimator;
use crate::warnings::CollectWarnings;
use std::sync::Arc;

fn sample_data() -> Matrix<f32> {
    // Two well-separated clusters
    Matrix::from_vec(
        6,
        2,
        vec![0.0, 0.0, 0.1, 0.1, 0.2, 0.0, 10.0, 10.0, 10.1, 10.1, 10.0, 10.2],
    )
    .expect("Sample data matrix creation should succeed")
}

#[test]
fn test_new() {
    let model = AffinityPropagation::new();
    assert!((model.damping() - 0.5).abs() < f32::EPSILON);
    assert_eq!(model.max_iter(), 200);
    assert_eq!(model.convergence_iter(), 15);
    assert_eq!(model.preference(), &Preference::Median);
    assert_eq!(model.affinity(), Affinity::Euclidean);
    assert_eq!(model.random_state(), None);
    assert!(model.options().copy());
    assert!(!model.is_fitted());
}

#[test]
fn test_default() {
    let model = AffinityPropagation::default();
    assert_eq!(model.options(), AffinityPropagation::new().options());
}

#[test]
fn test_builders() {
    let model = AffinityPropagation::new()
        .with_damping(0.7)
        .with_max_iter(50)
        .with_convergence_iter(5)
        .with_preference(-3.0)
        .with_affinity(Affinity::Precomputed)
        .with_copy(false)
        .with_verbose(true)
        .with_random_state(42);

    assert!((model.damping() - 0.7).abs() < f32::EPSILON);
    assert_eq!(model.max_iter(), 50);
    assert_eq!(model.convergence_iter(), 5);
    assert_eq!(model.preference(), &Preference::Scalar(-3.0));
    assert_eq!(model.affinity(), Affinity::Precomputed);
    assert!(!model.options().copy());
    assert!(model.options().verbose());
    assert_eq!(model.random_state(), Some(42));
}

#[test]
fn test_with_preferences() {
    let model = AffinityPropagation::new().with_preferences(vec![-1.0, -2.0]);
    assert_eq!(model.preference(), &Preference::PerSample(vec![-1.0, -2.0]));
}

#[test]
fn test_fit_basic() {
    let data = sample_data();
    let mut model = AffinityPropagation::new().with_random_state(0);
    model.fit(&data).expect("fit should succeed");

    assert!(model.is_fitted());
    assert_eq!(model.cluster_centers_indices(), &[1, 4]);
    assert_eq!(model.labels(), &[0, 0, 0, 1, 1, 1]);
    assert_eq!(model.n_features_in(), 2);
    assert!(model.n_iter() > 0 && model.n_iter() < 200);

    let centers = model.cluster_centers().expect("euclidean keeps centers");
    assert_eq!(centers.shape(), (2, 2));
    assert_eq!(centers.row(0), data.row(1));
    assert_eq!(centers.row(1), data.row(4));

    let s = model.affinity_matrix().expect("fitted");
    assert_eq!(s.shape(), (6, 6));
    assert!((s.get(0, 3) + 200.0).abs() < 1e-3);
}

#[test]
fn test_fit_predict() {
    let data = sample_data();
    let mut model = AffinityPropagation::new().with_random_state(3);
    let labels = model.fit_predict(&data).expect("fit should succeed");
    assert_eq!(labels, vec![0, 0, 0, 1, 1, 1]);
    assert_eq!(model.fitted_labels(), Some(&labels));
}

#[test]
fn test_predict_new_data() {
    let data = sample_data();
    let mut model = AffinityPropagation::new().with_random_state(0);
    model.fit(&data).expect("fit should succeed");

    let new_points =
        Matrix::from_vec(3, 2, vec![0.05, 0.05, 9.9, 10.0, 4.0, 4.0]).expect("valid matrix");
    let labels = model.predict(&new_points).expect("fitted");
    assert_eq!(labels, vec![0, 1, 0]);
}

#[test]
fn test_predict_sparse_input() {
    let data = sample_data();
    let mut model = AffinityPropagation::new().with_random_state(0);
    model.fit(&data).expect("fit should succeed");

    let sparse = CsrMatrix::from_dense(&data);
    assert_eq!(
        model.predict(&sparse).expect("fitted"),
        vec![0, 0, 0, 1, 1, 1]
    );
}

#[test]
fn test_high_damping_converges_to_same_clusters() {
    let data = sample_data();
    let mut model = AffinityPropagation::new()
        .with_damping(0.9)
        .with_random_state(0);
    model.fit(&data).expect("fit should succeed");

    assert_eq!(model.cluster_centers_indices(), &[1, 4]);
    assert_eq!(model.labels(), &[0, 0, 0, 1, 1, 1]);
}

#[test]
fn test_reproducibility() {
    let data = sample_data();

    let mut first = AffinityPropagation::new().with_random_state(42);
    first.fit(&data).expect("fit should succeed");

    let mut second = AffinityPropagation::new().with_random_state(42);
    second.fit(&data).expect("fit should succeed");

    assert_eq!(first.cluster_centers_indices(), second.cluster_centers_indices());
    assert_eq!(first.labels(), second.labels());
    assert_eq!(first.n_iter(), second.n_iter());
}

#[test]
fn test_verbose_fit() {
    let data = sample_data();
    let mut model = AffinityPropagation::new()
        .with_verbose(true)
        .with_random_state(0);
    model.fit(&data).expect("fit should succeed");
    assert_eq!(model.labels().len(), 6);
}

#[test]
fn test_empty_data_error() {
    let data = Matrix::from_vec(0, 2, vec![]).expect("Empty matrix creation should succeed");
    let mut model = AffinityPropagation::new();
    let result = model.fit(&data);
    assert!(matches!(result, Err(ExemplarError::EmptyInput { .. })));
    assert!(!model.is_fitted());
}

#[test]
fn test_precomputed_non_square_error() {
    let data = Matrix::from_vec(3, 2, vec![0.0; 6]).expect("Matrix creation should succeed");
    let mut model = AffinityPropagation::new().with_affinity(Affinity::Precomputed);
    let err = model.fit(&data).unwrap_err();
    assert!(matches!(err, ExemplarError::NotSquare { rows: 3, cols: 2 }));
}

#[test]
fn test_preferences_length_mismatch() {
    let data = sample_data();
    let mut model = AffinityPropagation::new().with_preferences(vec![0.0; 3]);
    let err = model.fit(&data).unwrap_err();
    assert!(matches!(err, ExemplarError::DimensionMismatch { .. }));
}

#[test]
fn test_zero_max_iter_error() {
    let data = sample_data();
    let mut model = AffinityPropagation::new().with_max_iter(0);
    assert!(matches!(
        model.fit(&data),
        Err(ExemplarError::InvalidHyperparameter { .. })
    ));
}

#[test]
fn test_single_sample() {
    let data = Matrix::from_vec(1, 2, vec![3.0, 4.0]).expect("Matrix creation should succeed");
    let collector = Arc::new(CollectWarnings::new());
    let mut model = AffinityPropagation::new().with_warning_handler(collector.clone());
    model.fit(&data).expect("fit should succeed");

    assert_eq!(model.cluster_centers_indices(), &[0]);
    assert_eq!(model.labels(), &[0]);
    assert_eq!(model.n_iter(), 0);
    assert!(collector.any_message_contains("mutually equal"));
    assert_eq!(collector.count_convergence(), 0);

    let far = Matrix::from_vec(1, 2, vec![-7.0, 1.0]).expect("valid matrix");
    assert_eq!(model.predict(&far).expect("fitted"), vec![0]);
}

#[test]
fn test_identical_points_high_preference() {
    let data = Matrix::from_vec(3, 2, vec![1.0; 6]).expect("Matrix creation should succeed");
    let mut model = AffinityPropagation::new().with_preference(1.0);
    model.fit(&data).expect("fit should succeed");

    assert_eq!(model.cluster_centers_indices(), &[0, 1, 2]);
    assert_eq!(model.labels(), &[0, 1, 2]);
}

#[test]
fn test_converged_fit_raises_no_warning() {
    let data = sample_data();
    let collector = Arc::new(CollectWarnings::new());
    let mut model = AffinityPropagation::new()
        .with_random_state(0)
        .with_warning_handler(collector.clone());
    model.fit(&data).expect("fit should succeed");
    model.predict(&data).expect("fitted");

    assert!(collector.warnings().is_empty());
}

#[test]
fn test_refit_replaces_state() {
    let mut model = AffinityPropagation::new().with_random_state(0);
    model.fit(&sample_data()).expect("fit should succeed");

    let three = Matrix::from_vec(3, 1, vec![0.0, 1.0, 5.0]).expect("valid matrix");
    model.fit(&three).expect("fit should succeed");

    assert_eq!(model.labels().len(), 3);
    assert_eq!(model.n_features_in(), 1);
    assert_eq!(model.affinity_matrix().map(Matrix::shape), Some((3, 3)));
}

#[test]
fn test_save_load() {
    let data = sample_data();
    let mut model = AffinityPropagation::new().with_random_state(42);
    model.fit(&data).expect("fit should succeed");

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("affinity_propagation.bin");
    model.save(&path).expect("Failed to save model");

    let loaded = AffinityPropagation::load(&path).expect("Failed to load model");

    assert_eq!(model.cluster_centers_indices(), loaded.cluster_centers_indices());
    assert_eq!(model.labels(), loaded.labels());
    assert_eq!(model.cluster_centers(), loaded.cluster_centers());
    assert_eq!(model.options(), loaded.options());
    assert_eq!(model.n_iter(), loaded.n_iter());
    assert_eq!(
        model.predict(&data).expect("fitted"),
        loaded.predict(&data).expect("fitted")
    );
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = AffinityPropagation::load(dir.path().join("missing.bin"));
    assert!(matches!(result, Err(ExemplarError::Io(_))));
}

#[test]
fn test_load_invalid_format() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("garbage.bin");
    std::fs::write(&path, [0xFF_u8; 3]).expect("write");
    assert!(AffinityPropagation::load(&path).is_err());
}

#[test]
fn test_free_function_matches_estimator() {
    let data = sample_data();
    let mut model = AffinityPropagation::new().with_random_state(11);
    model.fit(&data).expect("fit should succeed");

    let mut s = crate::metrics::pairwise::negative_squared_euclidean((&data).into())
        .expect("distances");
    let result = affinity_propagation(&mut s, &PropagationOptions::new().with_random_state(11))
        .expect("valid input");

    assert_eq!(result.cluster_centers_indices, model.cluster_centers_indices());
    assert_eq!(result.labels, model.labels());
    assert_eq!(result.n_iter, model.n_iter());
    assert!(result.converged);
}

#[test]
fn test_json_roundtrip_keeps_hyperparameters() {
    let model = AffinityPropagation::new()
        .with_damping(0.8)
        .with_preferences(vec![-1.0, -2.0, -3.0])
        .with_affinity(Affinity::Precomputed)
        .with_random_state(7);

    let json = serde_json::to_string(&model).expect("serialize");
    assert!(json.contains("Precomputed"));
    let restored: AffinityPropagation = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(restored.options(), model.options());
    assert_eq!(restored.affinity(), Affinity::Precomputed);
    assert!(!restored.is_fitted());
}
