// =========================================================================
// FALSIFY-MX: Matrix primitives contract (exemplar primitives)
//
// The affinity pipeline leans on three matrix guarantees: row-major
// layout, diagonal writes that touch nothing else, and row gathers that
// preserve order.
// =========================================================================

use super::*;

/// FALSIFY-MX-001: Row-major layout: get(i, j) == as_slice()[i * cols + j]
#[test]
fn falsify_mx_001_row_major_layout() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("valid");
    for i in 0..2 {
        for j in 0..3 {
            assert!(
                (m.get(i, j) - m.as_slice()[i * 3 + j]).abs() < 1e-6,
                "FALSIFIED MX-001: get({i},{j}) disagrees with row-major storage"
            );
        }
    }
}

/// FALSIFY-MX-002: set_diagonal only writes diagonal entries
#[test]
fn falsify_mx_002_set_diagonal_is_local() {
    let original = Matrix::from_vec(3, 3, (0..9).map(|x| x as f32).collect()).expect("valid");
    let mut m = original.clone();
    m.set_diagonal(&[-1.0, -2.0, -3.0]);

    for i in 0..3 {
        for j in 0..3 {
            if i == j {
                continue;
            }
            assert!(
                (m.get(i, j) - original.get(i, j)).abs() < 1e-6,
                "FALSIFIED MX-002: off-diagonal ({i},{j}) changed"
            );
        }
    }
    assert_eq!(m.diagonal(), vec![-1.0, -2.0, -3.0]);
}

/// FALSIFY-MX-003: select_rows preserves row content and order
#[test]
fn falsify_mx_003_select_rows_order() {
    let m = Matrix::from_vec(4, 2, (0..8).map(|x| x as f32).collect()).expect("valid");
    let idx = [3, 1, 1];
    let picked = m.select_rows(&idx);
    for (k, &i) in idx.iter().enumerate() {
        assert_eq!(
            picked.row(k),
            m.row(i),
            "FALSIFIED MX-003: gathered row {k} != source row {i}"
        );
    }
}

/// FALSIFY-MX-004: median lies between min and max
#[test]
fn falsify_mx_004_median_bounded() {
    let m = Matrix::from_vec(2, 3, vec![-5.0_f32, 0.0, 9.0, 1.0, 1.0, 3.0]).expect("valid");
    let med = m.median().expect("non-empty");
    assert!(
        (-5.0..=9.0).contains(&med),
        "FALSIFIED MX-004: median {med} outside [min, max]"
    );
    assert!((med - 1.0).abs() < 1e-6, "FALSIFIED MX-004: median={med}, expected 1.0");
}
