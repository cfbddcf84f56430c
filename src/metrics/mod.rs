//! Evaluation metrics and pairwise distances.
//!
//! Includes pairwise Euclidean distances (dense and sparse) and the
//! silhouette score for judging a clustering.

pub mod pairwise;

use crate::primitives::Matrix;
use pairwise::squared_euclidean;

fn distance(data: &Matrix<f32>, i: usize, j: usize) -> f32 {
    squared_euclidean(data.row(i), data.row(j)).sqrt()
}

/// Computes the mean distance from a point to other points in the same cluster.
///
/// Returns `None` when the point is alone in its cluster.
fn mean_intra_cluster_distance(
    data: &Matrix<f32>,
    point_idx: usize,
    cluster: i32,
    labels: &[i32],
) -> Option<f32> {
    let distances: Vec<f32> = labels
        .iter()
        .enumerate()
        .filter(|&(j, &label)| j != point_idx && label == cluster)
        .map(|(j, _)| distance(data, point_idx, j))
        .collect();

    if distances.is_empty() {
        None
    } else {
        Some(distances.iter().sum::<f32>() / distances.len() as f32)
    }
}

/// Computes the minimum mean distance from a point to points in other clusters.
fn min_inter_cluster_distance(
    data: &Matrix<f32>,
    point_idx: usize,
    cluster: i32,
    labels: &[i32],
    clusters: &[i32],
) -> f32 {
    let mut min_mean = f32::INFINITY;

    for &other_cluster in clusters {
        if other_cluster == cluster {
            continue;
        }

        let distances: Vec<f32> = labels
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == other_cluster)
            .map(|(j, _)| distance(data, point_idx, j))
            .collect();

        if !distances.is_empty() {
            let mean_dist = distances.iter().sum::<f32>() / distances.len() as f32;
            min_mean = min_mean.min(mean_dist);
        }
    }

    if min_mean == f32::INFINITY {
        0.0
    } else {
        min_mean
    }
}

/// Computes the silhouette coefficient for a single point.
fn silhouette_coefficient(a_i: f32, b_i: f32) -> f32 {
    let max_ab = a_i.max(b_i);
    if max_ab == 0.0 {
        0.0
    } else {
        (b_i - a_i) / max_ab
    }
}

/// Computes the silhouette score for clustering quality.
///
/// The silhouette score measures how similar a point is to its own cluster
/// compared to other clusters. Values range from -1 to 1, where higher is better.
///
/// s(i) = (b(i) - a(i)) / max(a(i), b(i))
///
/// where:
/// - a(i) = mean distance to other points in same cluster
/// - b(i) = mean distance to points in nearest other cluster
///
/// Points labeled `-1` (unclustered) are ignored and points alone in their
/// cluster score 0. Returns 0.0 when fewer than two clusters remain.
///
/// # Examples
///
/// ```
/// use exemplar::metrics::silhouette_score;
/// use exemplar::primitives::Matrix;
///
/// let data = Matrix::from_vec(4, 2, vec![
///     0.0, 0.0,
///     0.1, 0.1,
///     5.0, 5.0,
///     5.1, 5.1,
/// ]).expect("Matrix dimensions and data length are valid");
/// let labels = vec![0, 0, 1, 1];
/// let score = silhouette_score(&data, &labels);
/// assert!(score > 0.5);
/// ```
///
/// # Panics
///
/// Panics if `labels` does not have one entry per row of `data`.
#[must_use]
pub fn silhouette_score(data: &Matrix<f32>, labels: &[i32]) -> f32 {
    assert_eq!(
        labels.len(),
        data.n_rows(),
        "silhouette_score needs one label per sample"
    );
    let clustered: Vec<usize> = (0..labels.len()).filter(|&i| labels[i] >= 0).collect();

    if clustered.len() < 2 {
        return 0.0;
    }

    let mut clusters: Vec<i32> = clustered.iter().map(|&i| labels[i]).collect();
    clusters.sort_unstable();
    clusters.dedup();

    if clusters.len() < 2 {
        return 0.0;
    }

    let silhouettes: Vec<f32> = clustered
        .iter()
        .map(|&i| {
            let cluster = labels[i];
            // Singleton clusters score 0
            let Some(a_i) = mean_intra_cluster_distance(data, i, cluster, labels) else {
                return 0.0;
            };
            let b_i = min_inter_cluster_distance(data, i, cluster, labels, &clusters);
            silhouette_coefficient(a_i, b_i)
        })
        .collect();

    silhouettes.iter().sum::<f32>() / silhouettes.len() as f32
}

#[cfg(test)]
#[path = "tests_clustering_contract.rs"]
mod tests_clustering_contract;
