//! Tests for the pairwise distance histograms.

use latent_eda::{
    histogram::{par_pointwise_histogram, pointwise_histogram},
    BinEdges, EvalError,
};
use test_case::test_case;

mod common;

#[test_case(1, 2, 1 ; "1x2")]
#[test_case(2, 2, 2 ; "2x2")]
#[test_case(20, 4, 3 ; "20x4")]
#[test_case(50, 10, 4 ; "50x10")]
fn counts_every_distinct_pair_once(car: usize, dim: usize, seed: u64) -> Result<(), EvalError> {
    let data = common::tabular(car, dim, -1.0, 1.0, seed);
    let x = common::rows(&data);
    let edges = BinEdges::uniform(0.0, 100.0, 1.0)?;

    let hist = pointwise_histogram(&x, &edges)?;
    assert_eq!(hist.counts.len(), hist.edges.len() - 1);
    assert_eq!(hist.outside, 0);
    assert_eq!(hist.counts.iter().sum::<u64>(), (car * (car - 1)) as u64);

    let par_hist = par_pointwise_histogram(&x, &edges)?;
    assert_eq!(hist, par_hist);

    Ok(())
}

#[test_case(30, 3, 5 ; "30x3")]
#[test_case(40, 12, 6 ; "40x12")]
fn matches_brute_force_binning(car: usize, dim: usize, seed: u64) -> Result<(), EvalError> {
    let data = common::tabular(car, dim, -2.0, 2.0, seed);
    let matrix = common::distance_matrix(&data, &data);
    let edges = BinEdges::default();

    let mut expected = vec![0_u64; edges.num_bins()];
    let mut outside = 0;
    for (i, row) in matrix.iter().enumerate() {
        for (j, &d) in row.iter().enumerate() {
            if i == j {
                continue;
            }
            match edges.bin_of(d) {
                Some(k) => expected[k] += 1,
                None => outside += 1,
            }
        }
    }

    let hist = pointwise_histogram(&common::rows(&data), &edges)?;
    assert_eq!(hist.counts, expected);
    assert_eq!(hist.outside, outside);
    assert_eq!(hist.total(), (car * (car - 1)) as u64);

    Ok(())
}

#[test]
fn far_apart_points_fall_outside() -> Result<(), EvalError> {
    let data = common::two_clusters();
    let hist = pointwise_histogram(&common::rows(&data), &BinEdges::default())?;

    // 12 ordered pairs within the clusters are shorter than 0.5; the 18 pairs
    // across clusters are about 14.1 apart.
    assert_eq!(hist.counts[0], 12);
    assert_eq!(hist.counts[28], 18);
    assert_eq!(hist.outside, 0);
    assert_eq!(hist.total(), 30);

    let narrow = BinEdges::uniform(0.0, 5.0, 0.5)?;
    let hist = pointwise_histogram(&common::rows(&data), &narrow)?;
    assert_eq!(hist.counts[0], 12);
    assert_eq!(hist.outside, 18);

    Ok(())
}
