// =========================================================================
// FALSIFY-SIL: Silhouette score contract (exemplar metrics)
//
// References:
//   - Rousseeuw (1987) "Silhouettes: a graphical aid to the interpretation
//     and validation of cluster analysis"
// =========================================================================

use super::*;

fn two_blobs() -> Matrix<f32> {
    Matrix::from_vec(
        6,
        2,
        vec![0.0, 0.0, 0.1, 0.1, 0.2, 0.0, 5.0, 5.0, 5.1, 5.1, 5.0, 5.2],
    )
    .expect("valid matrix")
}

/// FALSIFY-SIL-001: Score lies in [-1, 1]
#[test]
fn falsify_sil_001_bounded() {
    let data = two_blobs();
    for labels in [
        vec![0, 0, 0, 1, 1, 1],
        vec![0, 1, 0, 1, 0, 1],
        vec![1, 1, 0, 0, 1, 0],
    ] {
        let s = silhouette_score(&data, &labels);
        assert!(
            (-1.0..=1.0).contains(&s),
            "FALSIFIED SIL-001: score={s} outside [-1, 1] for {labels:?}"
        );
    }
}

/// FALSIFY-SIL-002: Correct partition beats an interleaved one
#[test]
fn falsify_sil_002_good_partition_scores_higher() {
    let data = two_blobs();
    let good = silhouette_score(&data, &[0, 0, 0, 1, 1, 1]);
    let bad = silhouette_score(&data, &[0, 1, 0, 1, 0, 1]);
    assert!(
        good > 0.9 && good > bad,
        "FALSIFIED SIL-002: good={good}, bad={bad}"
    );
}

/// FALSIFY-SIL-003: Single cluster scores 0
#[test]
fn falsify_sil_003_single_cluster_zero() {
    let data = two_blobs();
    let s = silhouette_score(&data, &[0; 6]);
    assert!(s.abs() < 1e-9, "FALSIFIED SIL-003: score={s}, expected 0");
}

/// FALSIFY-SIL-004: Unclustered points (-1) do not change the score
#[test]
fn falsify_sil_004_noise_ignored() {
    let data = two_blobs();
    let full = silhouette_score(&data, &[0, 0, 0, 1, 1, 1]);

    let with_noise_data = Matrix::from_vec(
        7,
        2,
        vec![
            0.0, 0.0, 0.1, 0.1, 0.2, 0.0, 5.0, 5.0, 5.1, 5.1, 5.0, 5.2, 99.0, 99.0,
        ],
    )
    .expect("valid matrix");
    let with_noise = silhouette_score(&with_noise_data, &[0, 0, 0, 1, 1, 1, -1]);

    assert!(
        (full - with_noise).abs() < 1e-6,
        "FALSIFIED SIL-004: full={full}, with_noise={with_noise}"
    );
}

/// FALSIFY-SIL-005: All-noise labelling scores 0
#[test]
fn falsify_sil_005_all_noise_zero() {
    let data = two_blobs();
    assert!(silhouette_score(&data, &[-1; 6]).abs() < 1e-9);
}

/// FALSIFY-SIL-006: A point alone in its cluster contributes 0
#[test]
fn falsify_sil_006_singleton_scores_zero() {
    let data = Matrix::from_vec(3, 1, vec![0.0, 0.1, 10.0]).expect("valid matrix");
    let s = silhouette_score(&data, &[0, 0, 1]);

    // Two members of cluster 0: a = 0.1, b ~ 9.95
    let expected = 2.0 * (1.0 - 0.1 / 9.95) / 3.0;
    assert!(
        (s - expected).abs() < 1e-3,
        "FALSIFIED SIL-006: score={s}, expected {expected}"
    );
}

/// FALSIFY-SIL-007: Label count must match the sample count
#[test]
#[should_panic(expected = "one label per sample")]
fn falsify_sil_007_too_few_labels_rejected() {
    let _ = silhouette_score(&two_blobs(), &[0, 0, 0, 1, 1]);
}

/// FALSIFY-SIL-007: Extra labels are not silently dropped
#[test]
#[should_panic(expected = "one label per sample")]
fn falsify_sil_007_too_many_labels_rejected() {
    let _ = silhouette_score(&two_blobs(), &[0, 0, 0, 1, 1, 1, 1]);
}
