//! Data generation utilities for testing.

#![allow(dead_code)]

use latent_eda::{kernel::euclidean, MetadataRecord};
use rand::prelude::*;

/// Uniformly random points in `[min, max)^dim`.
pub fn tabular(car: usize, dim: usize, min: f64, max: f64, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..car)
        .map(|_| (0..dim).map(|_| rng.gen_range(min..max)).collect())
        .collect()
}

/// Borrows the rows of a table as slices.
pub fn rows<T>(data: &[Vec<T>]) -> Vec<&[T]> {
    data.iter().map(Vec::as_slice).collect()
}

/// The full `|x| x |y|` matrix of distances, computed the obvious way.
pub fn distance_matrix(x: &[Vec<f64>], y: &[Vec<f64>]) -> Vec<Vec<f64>> {
    x.iter()
        .map(|a| y.iter().map(|b| euclidean(a, b)).collect())
        .collect()
}

/// Two tight triangles of points, one around `(0, 0)` and one around `(10, 10)`.
pub fn two_clusters() -> Vec<Vec<f64>> {
    vec![
        vec![0.0, 0.0],
        vec![0.01, 0.0],
        vec![0.0, 0.01],
        vec![10.0, 10.0],
        vec![10.01, 10.0],
        vec![10.0, 10.01],
    ]
}

/// Metadata rows with a header and the given labels for items `0..labels.len()`.
pub fn metadata(labels: &[&str]) -> Vec<MetadataRecord> {
    core::iter::once(MetadataRecord::new(1, ["index", "category"]))
        .chain(
            labels
                .iter()
                .enumerate()
                .map(|(i, &l)| MetadataRecord::new(i + 2, [i.to_string(), l.to_string()])),
        )
        .collect()
}
