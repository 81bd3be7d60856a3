//! A `PointMatrix` holds the embedding of every item under analysis.

use distances::Number;

use crate::{EvalError, IndexSet};

/// A matrix of `N` points in `D` dimensions, stored row-major in one flat
/// vector.
///
/// The matrix is immutable after construction. Subsets of points are borrowed
/// as slices of rows, so the kernels never copy point data.
///
/// # Type Parameters
///
/// - `T`: The type of the coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PointMatrix<T> {
    /// The coordinates of all points, row after row.
    values: Vec<T>,
    /// The number of columns in each row.
    dimensionality: usize,
}

impl<T: Number> PointMatrix<T> {
    /// Creates a new `PointMatrix` from its rows.
    ///
    /// # Errors
    ///
    /// * `EmptySet` if there are no rows.
    /// * `InvalidDimension` if the rows have no columns.
    /// * `ShapeMismatch` if a row differs in length from the first row.
    /// * `NonFiniteValue` if any coordinate is NaN or infinite.
    pub fn new(rows: Vec<Vec<T>>) -> Result<Self, EvalError> {
        let dimensionality = rows.first().map(Vec::len).ok_or(EvalError::EmptySet {
            role: "point",
            rows: 0,
            required: 1,
        })?;
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != dimensionality) {
            return Err(EvalError::ShapeMismatch {
                row,
                expected: dimensionality,
                actual: r.len(),
            });
        }
        Self::from_flat(rows.into_iter().flatten().collect(), dimensionality)
    }

    /// Creates a new `PointMatrix` from row-major values.
    ///
    /// # Errors
    ///
    /// * `InvalidDimension` if `dimensionality` is zero.
    /// * `EmptySet` if there are no values.
    /// * `ShapeMismatch` if the number of values is not a multiple of
    ///   `dimensionality`.
    /// * `NonFiniteValue` if any coordinate is NaN or infinite.
    pub fn from_flat(values: Vec<T>, dimensionality: usize) -> Result<Self, EvalError> {
        if dimensionality == 0 {
            return Err(EvalError::InvalidDimension {
                expected: 1,
                actual: 0,
            });
        }
        if values.is_empty() {
            return Err(EvalError::EmptySet {
                role: "point",
                rows: 0,
                required: 1,
            });
        }
        let remainder = values.len() % dimensionality;
        if remainder != 0 {
            return Err(EvalError::ShapeMismatch {
                row: values.len() / dimensionality,
                expected: dimensionality,
                actual: remainder,
            });
        }
        if let Some(p) = values.iter().position(|v| !v.as_f64().is_finite()) {
            return Err(EvalError::NonFiniteValue {
                row: p / dimensionality,
                col: p % dimensionality,
            });
        }
        Ok(Self { values, dimensionality })
    }

    /// The number of points.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.values.len() / self.dimensionality
    }

    /// The number of coordinates in each point.
    #[must_use]
    pub const fn dimensionality(&self) -> usize {
        self.dimensionality
    }

    /// The coordinates of the `i`-th point.
    ///
    /// Panics if `i` is not smaller than the cardinality.
    #[must_use]
    pub fn row(&self, i: usize) -> &[T] {
        &self.values[i * self.dimensionality..(i + 1) * self.dimensionality]
    }

    /// All points, in order.
    #[must_use]
    pub fn rows(&self) -> Vec<&[T]> {
        self.values.chunks_exact(self.dimensionality).collect()
    }

    /// The first `k` points, or all of them if there are fewer than `k`.
    #[must_use]
    pub fn head(&self, k: usize) -> Vec<&[T]> {
        self.values.chunks_exact(self.dimensionality).take(k).collect()
    }

    /// The points at the indices in `set`.
    ///
    /// All indices must be smaller than the cardinality.
    #[must_use]
    pub fn rows_at(&self, set: &IndexSet) -> Vec<&[T]> {
        set.iter().map(|i| self.row(i)).collect()
    }

    /// The points at the indices that are not in `set`.
    #[must_use]
    pub fn rows_except(&self, set: &IndexSet) -> Vec<&[T]> {
        set.complement(self.cardinality()).map(|i| self.row(i)).collect()
    }

    /// The values of one coordinate across all points, as `f64`.
    #[must_use]
    pub fn column(&self, axis: usize) -> Vec<f64> {
        self.values
            .iter()
            .skip(axis)
            .step_by(self.dimensionality)
            .map(|v| v.as_f64())
            .collect()
    }
}
