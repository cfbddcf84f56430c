//! Benchmarks for Affinity Propagation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use exemplar::metrics::pairwise::negative_squared_euclidean;
use exemplar::prelude::*;

// Points on a spiral around three centers
fn grouped_data(size: usize) -> Matrix<f32> {
    let centers = [[0.0_f32, 0.0], [5.0, 5.0], [0.0, 5.0]];
    let data: Vec<f32> = (0..size)
        .flat_map(|k| {
            let c = centers[k % 3];
            let t = k as f32 * 2.4;
            let r = ((k / 3) as f32 + 0.5).sqrt() / (size as f32).sqrt();
            [c[0] + r * t.cos(), c[1] + r * t.sin()]
        })
        .collect();
    Matrix::from_vec(size, 2, data).unwrap()
}

fn bench_affinity_propagation_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("affinity_propagation_fit");

    for size in [30, 100, 300].iter() {
        let x = grouped_data(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut model = AffinityPropagation::new().with_random_state(0);
                model.fit(black_box(&x)).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_affinity_propagation_precomputed(c: &mut Criterion) {
    let mut group = c.benchmark_group("affinity_propagation_precomputed");

    for size in [30, 100, 300].iter() {
        let x = grouped_data(*size);
        let s = negative_squared_euclidean((&x).into()).unwrap();
        let options = PropagationOptions::new().with_random_state(0);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut s = s.clone();
                affinity_propagation(black_box(&mut s), &options).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_affinity_propagation_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("affinity_propagation_predict");

    for size in [30, 100, 300].iter() {
        let x = grouped_data(*size);
        let mut model = AffinityPropagation::new().with_random_state(0);
        model.fit(&x).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| model.predict(black_box(&x)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_affinity_propagation_fit,
    bench_affinity_propagation_precomputed,
    bench_affinity_propagation_predict
);
criterion_main!(benches);
