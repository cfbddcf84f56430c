// =========================================================================
// FALSIFY-AP: Affinity Propagation procedure contract (exemplar cluster)
//
// Invariants checked here:
//   - labels and exemplar indices agree (one exemplar per label, gapless)
//   - fixed seed => identical output; different seeds break ties differently
//   - copy=true never mutates S; copy=false only rewrites the diagonal
//   - equal similarities short-circuit with a warning
//   - exhausted iteration budget without exemplars => all -1
//
// References:
//   - Frey & Dueck (2007) "Clustering by Passing Messages Between Data Points"
// =========================================================================

use super::*;
use crate::cluster::test_fixtures::{similarity_of, three_groups_similarity};

fn assert_consistent(result: &Propagation) {
    let k = result.cluster_centers_indices.len();
    for (idx, &center) in result.cluster_centers_indices.iter().enumerate() {
        assert_eq!(
            result.labels[center], idx as i32,
            "FALSIFIED AP-001: exemplar {center} carries label {} instead of {idx}",
            result.labels[center]
        );
    }
    let mut unique: Vec<i32> = result.labels.iter().copied().filter(|&l| l >= 0).collect();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(
        unique.len(),
        k,
        "FALSIFIED AP-001: {} distinct labels for {k} exemplars",
        unique.len()
    );
    assert!(
        unique.iter().enumerate().all(|(i, &l)| l == i as i32),
        "FALSIFIED AP-001: labels not gapless: {unique:?}"
    );
}

/// FALSIFY-AP-001: Labels and exemplar indices are mutually consistent
#[test]
fn falsify_ap_001_labels_match_exemplars() {
    let mut s = three_groups_similarity();
    let median = s.median().expect("non-empty");
    let options = PropagationOptions::new()
        .with_preference(median * 10.0)
        .with_random_state(0);
    let result = affinity_propagation(&mut s, &options).expect("valid input");

    assert_eq!(
        result.n_clusters(),
        3,
        "FALSIFIED AP-001: found {} clusters, expected 3",
        result.n_clusters()
    );
    assert_consistent(&result);
    for (i, &label) in result.labels.iter().enumerate() {
        assert_eq!(label, (i % 3) as i32, "FALSIFIED AP-001: sample {i} mislabeled");
    }
}

/// FALSIFY-AP-002: Fixed seed gives identical output
#[test]
fn falsify_ap_002_deterministic_for_seed() {
    let options = PropagationOptions::new().with_random_state(42);
    let first = affinity_propagation(&mut three_groups_similarity(), &options).expect("valid input");
    let second = affinity_propagation(&mut three_groups_similarity(), &options).expect("valid input");
    assert_eq!(first, second, "FALSIFIED AP-002: same seed, different outcome");
}

/// FALSIFY-AP-003: copy=true leaves S (and its zero diagonal) untouched
#[test]
fn falsify_ap_003_copy_preserves_input() {
    let original = three_groups_similarity();
    let mut s = original.clone();
    let preference = original.median().expect("non-empty") * 10.0;
    let options = PropagationOptions::new()
        .with_preference(preference)
        .with_random_state(0);

    affinity_propagation(&mut s, &options).expect("valid input");

    assert_eq!(s, original, "FALSIFIED AP-003: S mutated with copy=true");
    assert!(
        s.diagonal().iter().all(|&d| d == 0.0),
        "FALSIFIED AP-003: diagonal changed with copy=true"
    );
}

/// FALSIFY-AP-004: copy=false writes preferences on the diagonal and
/// clusters exactly like copy=true
#[test]
fn falsify_ap_004_no_copy_same_clustering() {
    let original = three_groups_similarity();
    let preference = original.median().expect("non-empty") * 10.0;

    let copying = PropagationOptions::new()
        .with_preference(preference)
        .with_random_state(74);
    let in_place = copying.clone().with_copy(false);

    let mut s_copy = original.clone();
    let mut s_in_place = original.clone();
    let a = affinity_propagation(&mut s_copy, &copying).expect("valid input");
    let b = affinity_propagation(&mut s_in_place, &in_place).expect("valid input");

    assert_eq!(a, b, "FALSIFIED AP-004: copy flag changed the clustering");
    assert!(
        s_in_place
            .diagonal()
            .iter()
            .all(|&d| (d - preference).abs() < 1e-6),
        "FALSIFIED AP-004: diagonal does not hold the preference"
    );
}

/// FALSIFY-AP-005: Non-square S is rejected
#[test]
fn falsify_ap_005_non_square_rejected() {
    let s = three_groups_similarity();
    let keep: Vec<f32> = (0..s.n_rows())
        .flat_map(|i| s.row(i)[..s.n_cols() - 1].to_vec())
        .collect();
    let mut truncated = Matrix::from_vec(s.n_rows(), s.n_cols() - 1, keep).expect("valid");

    let err = affinity_propagation(&mut truncated, &PropagationOptions::new()).unwrap_err();
    assert!(
        err.to_string().contains("S must be a square array"),
        "FALSIFIED AP-005: unexpected error {err}"
    );
}

/// FALSIFY-AP-006: Equal similarities, preference above similarity =>
/// every sample is its own exemplar
#[test]
fn falsify_ap_006_equal_similarities_high_preference() {
    let mut s = similarity_of(&[vec![-1.0, 1.0], vec![1.0, -1.0]]);
    let result = affinity_propagation(&mut s, &PropagationOptions::new().with_preference(0.0))
        .expect("valid input");

    assert_eq!(result.cluster_centers_indices, vec![0, 1]);
    assert_eq!(result.labels, vec![0, 1]);
    assert!(
        result
            .warnings
            .iter()
            .any(|w| w.to_string().contains("mutually equal")),
        "FALSIFIED AP-006: missing 'mutually equal' warning"
    );
}

/// FALSIFY-AP-007: Equal similarities, preference below similarity =>
/// one cluster anchored at sample 0
#[test]
fn falsify_ap_007_equal_similarities_low_preference() {
    let mut s = similarity_of(&[vec![-1.0, 1.0], vec![1.0, -1.0]]);
    let result = affinity_propagation(&mut s, &PropagationOptions::new().with_preference(-10.0))
        .expect("valid input");

    assert_eq!(result.cluster_centers_indices, vec![0]);
    assert_eq!(result.labels, vec![0, 0]);
    assert_eq!(result.warnings, vec![ClusterWarning::EqualSimilarities]);
}

/// FALSIFY-AP-008: Different preferences => no warning, the
/// highest-preference sample becomes the exemplar
#[test]
fn falsify_ap_008_highest_preference_wins() {
    let mut s = similarity_of(&[vec![-1.0, 1.0], vec![1.0, -1.0]]);
    let options = PropagationOptions::new()
        .with_preference(vec![-20.0, -10.0])
        .with_random_state(37);
    let result = affinity_propagation(&mut s, &options).expect("valid input");

    assert!(
        result.warnings.is_empty(),
        "FALSIFIED AP-008: unexpected warnings {:?}",
        result.warnings
    );
    assert_eq!(result.cluster_centers_indices, vec![1]);
    assert_eq!(result.labels, vec![0, 0]);
}

/// FALSIFY-AP-009: One iteration on non-trivial input => no centers,
/// all samples -1, convergence warning
#[test]
fn falsify_ap_009_budget_exhausted() {
    let mut s = similarity_of(&[vec![0.0, 0.0], vec![1.0, 1.0], vec![-2.0, -2.0]]);
    for seed in [0, 75, 82] {
        let options = PropagationOptions::new()
            .with_preference(-10.0)
            .with_max_iter(1)
            .with_random_state(seed);
        let result = affinity_propagation(&mut s, &options).expect("valid input");

        assert!(result.cluster_centers_indices.is_empty());
        assert_eq!(result.labels, vec![-1, -1, -1]);
        assert!(
            result.warnings.iter().any(ClusterWarning::is_convergence),
            "FALSIFIED AP-009: no convergence warning (seed {seed})"
        );
    }
}

/// FALSIFY-AP-010: Unconverged run that still has exemplars warns
/// "did not converge" and keeps labels consistent
#[test]
fn falsify_ap_010_unconverged_with_exemplars() {
    let x = [
        vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        vec![0.0, 1.0, 1.0, 1.0, 0.0, 0.0],
        vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
    ];
    let mut s = similarity_of(&x);
    let options = PropagationOptions::new().with_max_iter(2).with_random_state(34);
    let result = affinity_propagation(&mut s, &options).expect("valid input");

    assert!(!result.converged);
    assert_eq!(result.n_iter, 2);
    assert!(
        result
            .warnings
            .iter()
            .any(|w| w.to_string().contains("did not converge")),
        "FALSIFIED AP-010: missing non-convergence warning"
    );
    assert_consistent(&result);
}

/// FALSIFY-AP-011: Equality detector only fires when both similarities
/// and preferences are all equal
#[test]
fn falsify_ap_011_equality_detector() {
    let unequal = similarity_of(&[vec![0.0, 0.0], vec![1.0, 1.0], vec![-2.0, -2.0]]);
    assert!(!equal_similarities_and_preferences(&unequal, &[0.0; 3]));
    assert!(!equal_similarities_and_preferences(&unequal, &[0.0, 0.0]));
    assert!(!equal_similarities_and_preferences(&unequal, &[0.0, 1.0]));

    let equal = similarity_of(&[vec![0.0, 0.0], vec![1.0, 1.0]]);
    assert!(!equal_similarities_and_preferences(&equal, &[0.0, 1.0]));
    assert!(equal_similarities_and_preferences(&equal, &[0.0, 0.0]));
    assert!(equal_similarities_and_preferences(&equal, &[0.0]));
}

/// Similarity matrix with two identical rows (1 and 2), so only the
/// tie-breaking noise decides whether they share an exemplar.
fn tied_similarities() -> Matrix<f32> {
    Matrix::from_vec(
        4,
        4,
        vec![
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 1.0, 0.0, //
            0.0, 1.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    )
    .expect("valid")
}

fn tied_labels(seed: u64) -> Vec<i32> {
    let options = PropagationOptions::new()
        .with_preference(1.0)
        .with_random_state(seed);
    affinity_propagation(&mut tied_similarities(), &options)
        .expect("valid input")
        .labels
}

/// FALSIFY-AP-012: Seeded noise breaks the tie between identical samples
#[test]
fn falsify_ap_012_seeded_tie_breaking() {
    assert_eq!(
        tied_labels(0),
        vec![0, 1, 1, 2],
        "FALSIFIED AP-012: seed 0 should merge the identical samples"
    );
    assert_eq!(
        tied_labels(6),
        vec![0, 1, 2, 3],
        "FALSIFIED AP-012: seed 6 should keep the identical samples apart"
    );
}

/// FALSIFY-AP-013: The random state actually drives the noise; across
/// seeds the tied input resolves both ways, mostly merged
#[test]
fn falsify_ap_013_random_state_changes_outcome() {
    let outcomes: Vec<Vec<i32>> = (0..50).map(tied_labels).collect();
    let merged = outcomes.iter().filter(|l| **l == [0, 1, 1, 2]).count();
    let split = outcomes.iter().filter(|l| **l == [0, 1, 2, 3]).count();

    assert_eq!(merged + split, 50, "FALSIFIED AP-013: unexpected labelling");
    assert!(
        merged > split && split > 0,
        "FALSIFIED AP-013: merged={merged}, split={split}"
    );
}
