//! Binned distributions of the pairwise distances within a set of points.

use distances::Number;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{kernel::row_distances, EvalError};

/// The largest number of bins `BinEdges::uniform` will create.
pub const MAX_BINS: usize = 1 << 20;

/// The boundaries of the bins of a histogram.
///
/// Bins are half-open, `[e_k, e_{k+1})`, except the last one, which also
/// includes its upper edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinEdges(Vec<f64>);

impl BinEdges {
    /// Creates bin edges from a strictly increasing sequence.
    ///
    /// # Errors
    ///
    /// * `InvalidBinEdges` if there are fewer than two edges, if any edge is not
    ///   finite, or if the edges are not strictly increasing.
    pub fn new(edges: Vec<f64>) -> Result<Self, EvalError> {
        if edges.len() < 2 {
            return Err(EvalError::InvalidBinEdges(format!(
                "need at least 2 edges but got {}",
                edges.len()
            )));
        }
        if edges.iter().any(|e| !e.is_finite()) {
            return Err(EvalError::InvalidBinEdges("edges must be finite".to_string()));
        }
        if let Some(w) = edges.windows(2).find(|w| w[0] >= w[1]) {
            return Err(EvalError::InvalidBinEdges(format!(
                "edges must be strictly increasing but {} is followed by {}",
                w[0], w[1]
            )));
        }
        Ok(Self(edges))
    }

    /// Creates the edges `start, start + step, ...` up to and including `stop`.
    ///
    /// # Errors
    ///
    /// * `InvalidBinEdges` if `step` is not positive, if `stop` is not greater
    ///   than `start`, or if there would be more than `MAX_BINS` bins.
    pub fn uniform(start: f64, stop: f64, step: f64) -> Result<Self, EvalError> {
        if !(step > 0.0 && stop > start) {
            return Err(EvalError::InvalidBinEdges(format!(
                "cannot step from {start} to {stop} by {step}"
            )));
        }
        let num_bins = ((stop - start) / step).round();
        if num_bins > MAX_BINS.as_f64() {
            return Err(EvalError::InvalidBinEdges(format!(
                "stepping from {start} to {stop} by {step} needs more than {MAX_BINS} bins"
            )));
        }
        let num_bins = (num_bins as usize).max(1);
        Self::new((0..=num_bins).map(|k| k.as_f64().mul_add(step, start)).collect())
    }

    /// The edges.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// The number of bins.
    #[must_use]
    pub fn num_bins(&self) -> usize {
        self.0.len() - 1
    }

    /// The bin into which `d` falls, or `None` if it is outside the edges.
    #[must_use]
    pub fn bin_of(&self, d: f64) -> Option<usize> {
        let (first, last) = (self.0[0], self.0[self.0.len() - 1]);
        if d.is_nan() || d < first || d > last {
            None
        } else if d == last {
            Some(self.num_bins() - 1)
        } else {
            Some(self.0.partition_point(|&e| e <= d) - 1)
        }
    }
}

impl Default for BinEdges {
    /// A uniform grid from 0 to 20 in steps of 0.5.
    fn default() -> Self {
        Self((0..=40_u32).map(|k| <f64 as From<u32>>::from(k) * 0.5).collect())
    }
}

/// A binned count of the distances between distinct ordered pairs of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceHistogram {
    /// The edges of the bins.
    pub edges: Vec<f64>,
    /// The number of distances in each bin.
    pub counts: Vec<u64>,
    /// The number of distances that fell outside the edges.
    pub outside: u64,
}

impl DistanceHistogram {
    /// An empty histogram over the given edges.
    fn empty(edges: &BinEdges) -> Self {
        Self {
            edges: edges.as_slice().to_vec(),
            counts: vec![0; edges.num_bins()],
            outside: 0,
        }
    }

    /// Adds one distance.
    fn add(&mut self, edges: &BinEdges, d: f64) {
        match edges.bin_of(d) {
            Some(k) => self.counts[k] += 1,
            None => self.outside += 1,
        }
    }

    /// Adds the counts of `other`, which must have the same edges.
    fn merge(mut self, other: Self) -> Self {
        for (a, b) in self.counts.iter_mut().zip(other.counts) {
            *a += b;
        }
        self.outside += other.outside;
        self
    }

    /// Removes one self-pair for each of `n` rows from wherever a distance of
    /// zero was binned.
    fn remove_self_pairs(&mut self, edges: &BinEdges, n: usize) {
        let n = n.as_u64();
        match edges.bin_of(0.0) {
            Some(k) => self.counts[k] -= n,
            None => self.outside -= n,
        }
    }

    /// The total number of distances counted, including those outside the
    /// edges.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum::<u64>() + self.outside
    }

    /// Iterates over the bins as `(lower, upper, count)`.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, u64)> + '_ {
        self.edges
            .windows(2)
            .zip(self.counts.iter())
            .map(|(w, &c)| (w[0], w[1], c))
    }
}

/// Computes the histogram of the distances between all ordered pairs of
/// distinct points in `x`.
///
/// Each row is compared against every row of `x`, including itself, and the
/// distances are binned. The `|x|` self-pairs are then removed from the bin
/// that holds zero, so the histogram accounts for exactly `n * (n - 1)`
/// distances.
///
/// # Errors
///
/// * `EmptySet` if `x` has no rows.
pub fn pointwise_histogram<T: Number>(x: &[&[T]], edges: &BinEdges) -> Result<DistanceHistogram, EvalError> {
    if x.is_empty() {
        return Err(EvalError::EmptySet {
            role: "histogram",
            rows: 0,
            required: 1,
        });
    }

    let mut hist = DistanceHistogram::empty(edges);
    for row in x {
        for d in row_distances(row, x) {
            hist.add(edges, d);
        }
    }
    hist.remove_self_pairs(edges, x.len());
    Ok(hist)
}

/// Parallelized version of [`pointwise_histogram`].
///
/// # Errors
///
/// See [`pointwise_histogram`].
pub fn par_pointwise_histogram<T: Number>(x: &[&[T]], edges: &BinEdges) -> Result<DistanceHistogram, EvalError> {
    if x.is_empty() {
        return Err(EvalError::EmptySet {
            role: "histogram",
            rows: 0,
            required: 1,
        });
    }

    let mut hist = x
        .par_iter()
        .map(|row| {
            let mut h = DistanceHistogram::empty(edges);
            for d in row_distances(row, x) {
                h.add(edges, d);
            }
            h
        })
        .reduce(|| DistanceHistogram::empty(edges), DistanceHistogram::merge);
    hist.remove_self_pairs(edges, x.len());
    Ok(hist)
}

#[cfg(test)]
mod tests {
    use distances::Number;

    use super::{pointwise_histogram, BinEdges, MAX_BINS};
    use crate::EvalError;

    #[test]
    fn default_edges() {
        let edges = BinEdges::default();
        assert_eq!(edges.num_bins(), 40);
        assert_eq!(edges.as_slice().first(), Some(&0.0));
        assert_eq!(edges.as_slice().last(), Some(&20.0));
        assert_eq!(Ok(edges), BinEdges::uniform(0.0, 20.0, 0.5));
    }

    #[test]
    fn bin_of() -> Result<(), EvalError> {
        let edges = BinEdges::new(vec![0.0, 1.0, 2.0])?;
        assert_eq!(edges.bin_of(0.0), Some(0));
        assert_eq!(edges.bin_of(0.999), Some(0));
        assert_eq!(edges.bin_of(1.0), Some(1));
        assert_eq!(edges.bin_of(2.0), Some(1));
        assert_eq!(edges.bin_of(2.5), None);
        assert_eq!(edges.bin_of(-0.5), None);
        Ok(())
    }

    #[test]
    fn bad_edges() {
        assert!(BinEdges::new(vec![1.0]).is_err());
        assert!(BinEdges::new(vec![0.0, 0.0]).is_err());
        assert!(BinEdges::new(vec![0.0, f64::INFINITY]).is_err());
        assert!(BinEdges::uniform(1.0, 0.0, 0.5).is_err());
        assert!(BinEdges::uniform(0.0, 1.0, 0.0).is_err());
    }

    #[test]
    fn too_many_bins() {
        assert!(matches!(
            BinEdges::uniform(0.0, 20.0, 1e-300),
            Err(EvalError::InvalidBinEdges(_))
        ));
        assert!(BinEdges::uniform(0.0, f64::INFINITY, 0.5).is_err());
        assert!(BinEdges::uniform(0.0, (MAX_BINS + 1).as_f64(), 1.0).is_err());

        let edges = BinEdges::uniform(0.0, 1.0, 1.0 / 1024.0);
        assert_eq!(edges.map(|e| e.num_bins()), Ok(1024));
    }

    #[test]
    fn square() -> Result<(), EvalError> {
        // A unit square: 8 ordered sides of length 1, 4 ordered diagonals of
        // length sqrt(2).
        let data = vec![vec![0.0_f64, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]];
        let x = data.iter().map(Vec::as_slice).collect::<Vec<_>>();
        let edges = BinEdges::new(vec![0.0, 0.5, 1.2, 1.5])?;
        let hist = pointwise_histogram(&x, &edges)?;
        assert_eq!(hist.counts, vec![0, 8, 4]);
        assert_eq!(hist.outside, 0);
        assert_eq!(hist.total(), 12);
        Ok(())
    }

    #[test]
    fn self_pairs_outside_edges() -> Result<(), EvalError> {
        let data = vec![vec![0.0_f64], vec![3.0], vec![10.0]];
        let x = data.iter().map(Vec::as_slice).collect::<Vec<_>>();
        let edges = BinEdges::new(vec![1.0, 5.0])?;
        let hist = pointwise_histogram(&x, &edges)?;
        // 3 twice in range; 7 twice and 10 twice out of range.
        assert_eq!(hist.counts, vec![2]);
        assert_eq!(hist.outside, 4);
        Ok(())
    }

    #[test]
    fn empty() {
        let x: Vec<&[f64]> = Vec::new();
        assert!(matches!(
            pointwise_histogram(&x, &BinEdges::default()),
            Err(EvalError::EmptySet { .. })
        ));
    }
}
