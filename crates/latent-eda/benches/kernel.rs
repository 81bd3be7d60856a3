#![allow(missing_docs)]

use std::hint::black_box;

use criterion::*;
use rand::prelude::*;

use latent_eda::kernel::{average_distance, par_average_distance};

fn tabular(car: usize, dim: usize, seed: u64) -> Vec<Vec<f32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..car)
        .map(|_| (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect())
        .collect()
}

fn average_distances(c: &mut Criterion) {
    let car = 1_000;

    for dim in [4, 32, 256] {
        let data = tabular(car, dim, 42);
        let (inside, outside) = data.split_at(car / 10);
        let inside = inside.iter().map(Vec::as_slice).collect::<Vec<_>>();
        let outside = outside.iter().map(Vec::as_slice).collect::<Vec<_>>();

        let mut group = c.benchmark_group(format!("average-distance-{dim}"));
        group.throughput(Throughput::Elements((inside.len() * (inside.len() + outside.len())) as u64));

        group.bench_function("sequential", |b| {
            b.iter(|| {
                black_box(average_distance(&inside, None).ok());
                black_box(average_distance(&inside, Some(&outside)).ok());
            });
        });
        group.bench_function("parallel", |b| {
            b.iter(|| {
                black_box(par_average_distance(&inside, None).ok());
                black_box(par_average_distance(&inside, Some(&outside)).ok());
            });
        });

        group.finish();
    }
}

criterion_group!(benches, average_distances);
criterion_main!(benches);
