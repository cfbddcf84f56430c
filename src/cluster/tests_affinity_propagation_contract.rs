// =========================================================================
// FALSIFY-APE: AffinityPropagation estimator contract (exemplar cluster)
//
// Invariants checked here:
//   - precomputed similarities cluster exactly like the euclidean path
//   - fit_predict labels equal predict on the training data
//   - predict rejects unfitted models, wrong widths, precomputed fits
//   - a fit without exemplars predicts -1 and warns on every call
//   - sparse and dense inputs agree
// =========================================================================

use super::*;
use crate::cluster::test_fixtures::three_groups;
use crate::primitives::CsrMatrix;
use crate::warnings::CollectWarnings;

fn three_points() -> Matrix<f32> {
    Matrix::from_vec(3, 2, vec![0.0, 0.0, 1.0, 1.0, -2.0, -2.0]).expect("valid")
}

fn preference_for(x: &Matrix<f32>) -> f32 {
    let s = negative_squared_euclidean(x.into()).expect("distances");
    s.median().expect("non-empty") * 10.0
}

/// FALSIFY-APE-001: Precomputed S from the same data gives identical labels
#[test]
fn falsify_ape_001_precomputed_matches_euclidean() {
    let x = three_groups();
    let s = negative_squared_euclidean((&x).into()).expect("distances");
    let preference = preference_for(&x);

    let mut euclidean = AffinityPropagation::new()
        .with_preference(preference)
        .with_random_state(28);
    let mut precomputed = AffinityPropagation::new()
        .with_affinity(Affinity::Precomputed)
        .with_preference(preference)
        .with_random_state(28);

    let a = euclidean.fit_predict(&x).expect("fit");
    let b = precomputed.fit_predict(&s).expect("fit");

    assert_eq!(a, b, "FALSIFIED APE-001: precomputed labels differ");
    assert_eq!(
        euclidean.cluster_centers_indices(),
        precomputed.cluster_centers_indices()
    );
    assert_eq!(euclidean.cluster_centers_indices(), &[0, 1, 2]);
    assert!(precomputed.cluster_centers().is_none());
    let centers = euclidean.cluster_centers().expect("euclidean keeps centers");
    assert_eq!(centers.shape(), (3, 2));
    assert_eq!(centers.row(1), x.row(1));
}

/// FALSIFY-APE-002: Sparse input with a precomputed affinity is rejected
#[test]
fn falsify_ape_002_sparse_precomputed_rejected() {
    let x = three_groups();
    let s = negative_squared_euclidean((&x).into()).expect("distances");
    let sparse = CsrMatrix::from_dense(&s);

    let mut model = AffinityPropagation::new().with_affinity(Affinity::Precomputed);
    let err = model.fit(&sparse).unwrap_err();
    assert!(
        err.to_string().contains("A sparse matrix was passed, but dense data is required"),
        "FALSIFIED APE-002: unexpected error {err}"
    );
    assert!(!model.is_fitted());
}

/// FALSIFY-APE-003: fit_predict equals predict on the training data
#[test]
fn falsify_ape_003_fit_predict_equals_predict() {
    let x = three_groups();
    let mut model = AffinityPropagation::new()
        .with_preference(preference_for(&x))
        .with_random_state(63);

    let fitted = model.fit_predict(&x).expect("fit");
    let predicted = model.predict(&x).expect("fitted");

    assert_eq!(fitted, predicted, "FALSIFIED APE-003: labels disagree");
    assert_eq!(model.labels(), fitted.as_slice());
}

/// FALSIFY-APE-004: predict before fit is an error
#[test]
fn falsify_ape_004_predict_requires_fit() {
    let model = AffinityPropagation::new();
    let err = model.predict(&three_points()).unwrap_err();
    assert!(matches!(err, ExemplarError::NotFitted { .. }));
    assert!(err.to_string().contains("not fitted yet"));
}

/// FALSIFY-APE-005: predict with a different feature count reports both
/// widths
#[test]
fn falsify_ape_005_feature_count_checked() {
    let x = three_groups();
    let n = x.n_rows();
    let mut gram = Matrix::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            let dot: f32 = x.row(i).iter().zip(x.row(j)).map(|(a, b)| a * b).sum();
            gram.set(i, j, dot);
        }
    }

    let mut model = AffinityPropagation::new()
        .with_affinity(Affinity::Precomputed)
        .with_random_state(0);
    model.fit(&gram).expect("fit");

    let err = model.predict(&x).unwrap_err();
    assert!(
        err.to_string()
            .contains("X has 2 features, but AffinityPropagation is expecting 60 features as input."),
        "FALSIFIED APE-005: unexpected error {err}"
    );
}

/// FALSIFY-APE-006: predict on a precomputed fit is unsupported
#[test]
fn falsify_ape_006_precomputed_predict_unsupported() {
    let x = three_points();
    let s = negative_squared_euclidean((&x).into()).expect("distances");
    let mut model = AffinityPropagation::new()
        .with_affinity(Affinity::Precomputed)
        .with_preference(-10.0)
        .with_random_state(0);
    model.fit(&s).expect("fit");

    let err = model.predict(&s).unwrap_err();
    assert!(
        err.to_string()
            .contains("Predict method is not supported when affinity='precomputed'."),
        "FALSIFIED APE-006: unexpected error {err}"
    );
}

/// FALSIFY-APE-007: A fit without exemplars labels everything -1 and warns
/// on fit and on each predict
#[test]
fn falsify_ape_007_no_centers_predicts_noise() {
    let x = three_points();
    let collector = Arc::new(CollectWarnings::new());
    let mut model = AffinityPropagation::new()
        .with_preference(-10.0)
        .with_max_iter(1)
        .with_random_state(75)
        .with_warning_handler(collector.clone());

    model.fit(&x).expect("fit");
    assert_eq!(collector.count_convergence(), 1);
    assert!(model.cluster_centers_indices().is_empty());
    assert_eq!(model.labels(), &[-1, -1, -1]);
    assert_eq!(model.cluster_centers().map(Matrix::n_rows), Some(0));

    let predicted = model.predict(&x).expect("fitted");
    assert_eq!(predicted, vec![-1, -1, -1]);
    assert_eq!(
        collector.count_convergence(),
        2,
        "FALSIFIED APE-007: predict did not warn"
    );
    assert!(collector.any_message_contains("will not have any cluster centers"));
}

/// FALSIFY-APE-008: Sparse predict matches dense predict
#[test]
fn falsify_ape_008_sparse_predict_matches_dense() {
    let x = three_groups();
    let sparse = CsrMatrix::from_dense(&x);
    let mut model = AffinityPropagation::new()
        .with_preference(preference_for(&x))
        .with_random_state(42);
    model.fit(&x).expect("fit");

    assert_eq!(
        model.predict(&x).expect("fitted"),
        model.predict(&sparse).expect("fitted"),
        "FALSIFIED APE-008: sparse and dense predictions differ"
    );
}

/// FALSIFY-APE-009: Sparse training data clusters like its dense form
#[test]
fn falsify_ape_009_sparse_fit_matches_dense() {
    let x = three_groups();
    let sparse = CsrMatrix::from_dense(&x);
    let preference = preference_for(&x);

    let mut dense_model = AffinityPropagation::new()
        .with_preference(preference)
        .with_random_state(42);
    let mut sparse_model = dense_model.clone();

    let dense_labels = dense_model.fit_predict(&x).expect("fit");
    let sparse_labels = sparse_model.fit_predict(&sparse).expect("fit");

    assert_eq!(dense_labels, sparse_labels, "FALSIFIED APE-009");
    assert_eq!(dense_model.cluster_centers(), sparse_model.cluster_centers());
}

/// FALSIFY-APE-010: copy=false keeps the preferences in the stored
/// similarity matrix without changing the result
#[test]
fn falsify_ape_010_copy_flag_only_touches_diagonal() {
    let x = three_groups();
    let preference = preference_for(&x);
    let base = AffinityPropagation::new()
        .with_preference(preference)
        .with_random_state(9);

    let mut copying = base.clone();
    let mut in_place = base.with_copy(false);
    copying.fit(&x).expect("fit");
    in_place.fit(&x).expect("fit");

    assert_eq!(copying.labels(), in_place.labels());
    let kept = copying.affinity_matrix().expect("fitted");
    let written = in_place.affinity_matrix().expect("fitted");
    assert!(kept.diagonal().iter().all(|&d| d == 0.0));
    assert!(written.diagonal().iter().all(|&d| d == preference));
}

/// FALSIFY-APE-011: Out-of-range damping fails the fit
#[test]
fn falsify_ape_011_invalid_damping() {
    for damping in [0.0, 0.49, 1.0, 1.5] {
        let mut model = AffinityPropagation::new().with_damping(damping);
        let err = model.fit(&three_points()).unwrap_err();
        assert!(
            matches!(err, ExemplarError::InvalidHyperparameter { .. }),
            "FALSIFIED APE-011: damping={damping} accepted ({err})"
        );
    }
}

/// FALSIFY-APE-012: Precomputed f32 similarities with tied rows, the
/// random state picks the tie-break
#[test]
fn falsify_ape_012_precomputed_tied_rows() {
    let s = Matrix::from_vec(
        4,
        4,
        vec![
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 1.0, 0.0, //
            0.0, 1.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    )
    .expect("valid");

    let labels_for = |seed: u64| {
        AffinityPropagation::new()
            .with_affinity(Affinity::Precomputed)
            .with_preference(1.0)
            .with_random_state(seed)
            .fit_predict(&s)
            .expect("fit")
    };

    assert_eq!(labels_for(0), vec![0, 1, 1, 2], "FALSIFIED APE-012");
    assert_eq!(labels_for(6), vec![0, 1, 2, 3], "FALSIFIED APE-012");
}
