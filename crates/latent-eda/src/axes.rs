//! Per-axis summary statistics of an embedding.
//!
//! These show how much of each latent axis is actually used. An axis whose
//! inter-quartile range is tiny carries little information.

use distances::Number;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::PointMatrix;

/// The inter-quartile range above which an axis counts as active.
pub const DEFAULT_MIN_IQR: f64 = 0.4;

/// The spread of the values along one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSummary {
    /// The index of the axis.
    pub axis: usize,
    /// The smallest value.
    pub min: f64,
    /// The 25th percentile.
    pub q25: f64,
    /// The 50th percentile.
    pub median: f64,
    /// The 75th percentile.
    pub q75: f64,
    /// The largest value.
    pub max: f64,
}

impl AxisSummary {
    /// Summarizes the values of one axis.
    ///
    /// `values` must not be empty.
    #[must_use]
    pub fn new(axis: usize, mut values: Vec<f64>) -> Self {
        values.sort_by(f64::total_cmp);
        Self {
            axis,
            min: values[0],
            q25: percentile(&values, 25.0),
            median: percentile(&values, 50.0),
            q75: percentile(&values, 75.0),
            max: values[values.len() - 1],
        }
    }

    /// The inter-quartile range.
    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.q75 - self.q25
    }

    /// Whether the inter-quartile range exceeds `min_iqr`.
    #[must_use]
    pub fn is_active(&self, min_iqr: f64) -> bool {
        self.iqr() > min_iqr
    }
}

/// The `p`-th percentile of sorted values, interpolating linearly between the
/// two nearest order statistics.
///
/// `sorted` must not be empty and `p` must be in `[0, 100]`.
#[must_use]
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let pos = p / 100.0 * (sorted.len() - 1).as_f64();
    let lo = pos.floor();
    let (i, j) = (lo as usize, pos.ceil() as usize);
    (sorted[j] - sorted[i]).mul_add(pos - lo, sorted[i])
}

/// Summarizes every axis of the points.
#[must_use]
pub fn axis_summaries<T: Number>(points: &PointMatrix<T>) -> Vec<AxisSummary> {
    (0..points.dimensionality())
        .map(|axis| AxisSummary::new(axis, points.column(axis)))
        .collect()
}

/// Parallelized version of [`axis_summaries`].
#[must_use]
pub fn par_axis_summaries<T: Number>(points: &PointMatrix<T>) -> Vec<AxisSummary> {
    (0..points.dimensionality())
        .into_par_iter()
        .map(|axis| AxisSummary::new(axis, points.column(axis)))
        .collect()
}

/// The number of axes whose inter-quartile range exceeds `min_iqr`.
#[must_use]
pub fn count_active_axes(summaries: &[AxisSummary], min_iqr: f64) -> usize {
    summaries.iter().filter(|s| s.is_active(min_iqr)).count()
}
