//! Average pairwise Euclidean distances within and between sets of points.
//!
//! The kernels stream over the rows of the first set. Each row is compared
//! against the whole comparison set and only the running sum is kept, so memory
//! use is linear in the size of the sets and no pairwise distance matrix is
//! ever built.

use distances::Number;
use rayon::prelude::*;

use crate::{EvalError, PointMatrix};

/// The Euclidean distance between two points, as `f64`.
#[must_use]
pub fn euclidean<T: Number>(x: &[T], y: &[T]) -> f64 {
    distances::vectors::euclidean::<T, f64>(x, y)
}

/// The sum of the distances from `row` to every point in `others`.
fn row_sum<T: Number>(row: &[T], others: &[&[T]]) -> f64 {
    others.iter().map(|o| euclidean(row, o)).sum()
}

/// Checks that every row in `rows` has `dim` coordinates.
fn check_rows<T>(rows: &[&[T]], dim: usize) -> Result<(), EvalError> {
    rows.iter().find(|row| row.len() != dim).map_or(Ok(()), |row| {
        Err(EvalError::InvalidDimension {
            expected: dim,
            actual: row.len(),
        })
    })
}

/// Checks the preconditions of the kernels and returns the denominator used to
/// average the distances from one row.
fn check_sets<T>(x: &[&[T]], y: Option<&[&[T]]>) -> Result<f64, EvalError> {
    let dim = match x.first() {
        Some(row) => row.len(),
        None => {
            return Err(EvalError::EmptySet {
                role: "query",
                rows: 0,
                required: 1,
            })
        }
    };
    if dim == 0 {
        return Err(EvalError::InvalidDimension {
            expected: 1,
            actual: 0,
        });
    }
    check_rows(x, dim)?;

    match y {
        None => {
            if x.len() < 2 {
                return Err(EvalError::EmptySet {
                    role: "intra-set",
                    rows: x.len(),
                    required: 2,
                });
            }
            Ok((x.len() - 1).as_f64())
        }
        Some(y) => {
            if y.is_empty() {
                return Err(EvalError::EmptySet {
                    role: "comparison",
                    rows: 0,
                    required: 1,
                });
            }
            check_rows(y, dim)?;
            Ok(y.len().as_f64())
        }
    }
}

/// The average Euclidean distance between the points of `x`, or from the
/// points of `x` to the points of `y`.
///
/// Without `y`, this averages over all ordered pairs of distinct rows of `x`:
/// each row's distances to every row of `x` are summed (the self-distance is
/// zero) and divided by `|x| - 1`. With `y`, each row's distances to every row
/// of `y` are averaged, and those per-row averages are averaged over `x`.
///
/// # Errors
///
/// * `EmptySet` if `x` or `y` has no rows, or if `y` is `None` and `x` has only
///   one row.
/// * `InvalidDimension` if the points have no coordinates, or if any row of `x`
///   or `y` differs in length from the first row of `x`.
pub fn average_distance<T: Number>(x: &[&[T]], y: Option<&[&[T]]>) -> Result<f64, EvalError> {
    let denom = check_sets(x, y)?;
    let others = y.unwrap_or(x);
    let total = x.iter().map(|row| row_sum(row, others) / denom).sum::<f64>();
    Ok(total / x.len().as_f64())
}

/// Parallelized version of [`average_distance`].
///
/// The rows of `x` are processed by independent rayon tasks. The result may
/// differ from the sequential version in the last bits because of summation
/// order.
///
/// # Errors
///
/// See [`average_distance`].
pub fn par_average_distance<T: Number>(x: &[&[T]], y: Option<&[&[T]]>) -> Result<f64, EvalError> {
    let denom = check_sets(x, y)?;
    let others = y.unwrap_or(x);
    let total = x.par_iter().map(|row| row_sum(row, others) / denom).sum::<f64>();
    Ok(total / x.len().as_f64())
}

/// The distances from `row` to every point in `others`.
///
/// This is the one intermediate vector the kernels are allowed to hold.
#[must_use]
pub fn row_distances<T: Number>(row: &[T], others: &[&[T]]) -> Vec<f64> {
    others.iter().map(|o| euclidean(row, o)).collect()
}

/// The average distance between distinct points among the first `sample`
/// points of the matrix.
///
/// Comparing every point with every other point is quadratic, so a global
/// baseline is usually estimated from a prefix of the data.
///
/// # Errors
///
/// * `EmptySet` if fewer than two points are used.
pub fn baseline_distance<T: Number>(points: &PointMatrix<T>, sample: usize) -> Result<f64, EvalError> {
    let x = points.head(sample);
    ftlog::debug!("Baseline distance over {} of {} points", x.len(), points.cardinality());
    average_distance(&x, None)
}

/// Parallelized version of [`baseline_distance`].
///
/// # Errors
///
/// See [`baseline_distance`].
pub fn par_baseline_distance<T: Number>(points: &PointMatrix<T>, sample: usize) -> Result<f64, EvalError> {
    let x = points.head(sample);
    ftlog::debug!("Baseline distance over {} of {} points", x.len(), points.cardinality());
    par_average_distance(&x, None)
}
