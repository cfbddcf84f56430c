//! Data sets shared by the clustering tests.

use crate::metrics::pairwise::negative_squared_euclidean;
use crate::primitives::Matrix;

/// Three groups of twenty points on a sunflower spiral around
/// (11, 11), (9, 9) and (11, 9); sample k belongs to group k % 3 and
/// samples 0, 1, 2 sit at the group centers.
pub(crate) fn three_groups() -> Matrix<f32> {
    let centers = [[11.0_f64, 11.0], [9.0, 9.0], [11.0, 9.0]];
    let n = 60;
    let rows: Vec<Vec<f32>> = (0..n)
        .map(|k| {
            let c = centers[k % 3];
            let t = k as f64 * 2.399_963_229_728_653;
            let r = 0.4 * (((k / 3) as f64 + 0.5) / (n as f64 / 3.0)).sqrt();
            vec![(c[0] + r * t.cos()) as f32, (c[1] + r * t.sin()) as f32]
        })
        .collect();
    Matrix::from_rows(&rows).expect("equal rows")
}

/// Negative squared euclidean similarities of `rows`.
pub(crate) fn similarity_of(rows: &[Vec<f32>]) -> Matrix<f32> {
    let x = Matrix::from_rows(rows).expect("equal rows");
    negative_squared_euclidean((&x).into()).expect("distances")
}

/// Similarity matrix of [`three_groups`].
pub(crate) fn three_groups_similarity() -> Matrix<f32> {
    negative_squared_euclidean((&three_groups()).into()).expect("distances")
}
