//! The embeddings the shell can read.

use std::path::{Path, PathBuf};

use latent_eda::{
    axes::{self, AxisSummary},
    histogram, io, kernel, scorer, BinEdges, DistanceHistogram, EvalError, GroupIndex, PointMatrix,
    SeparationReport,
};

/// An embedding of one of the element types that `.npy` files may hold.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellPoints {
    /// Single-precision points.
    F32(PointMatrix<f32>),
    /// Double-precision points.
    F64(PointMatrix<f64>),
}

impl ShellPoints {
    /// Reads a `.npy` file of `f32`, falling back to `f64`.
    pub fn read_npy<P: AsRef<Path>>(path: P) -> Result<Self, EvalError> {
        let path = path.as_ref();
        match io::read_npy::<f32, _>(path) {
            Ok(points) => Ok(Self::F32(points)),
            Err(EvalError::DataUnavailable { reason, .. }) => {
                ftlog::debug!("Not an f32 array ({reason}), trying f64");
                io::read_npy::<f64, _>(path).map(Self::F64)
            }
            Err(e) => Err(e),
        }
    }

    /// Reads a headerless `.csv` file of numbers.
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self, EvalError> {
        io::read_csv::<f64, _>(path).map(Self::F64)
    }

    /// The number of points.
    pub fn cardinality(&self) -> usize {
        match self {
            Self::F32(p) => p.cardinality(),
            Self::F64(p) => p.cardinality(),
        }
    }

    /// The number of coordinates per point.
    pub const fn dimensionality(&self) -> usize {
        match self {
            Self::F32(p) => p.dimensionality(),
            Self::F64(p) => p.dimensionality(),
        }
    }

    /// Scores and ranks every group.
    pub fn score(&self, groups: &GroupIndex, parallel: bool) -> SeparationReport {
        match (self, parallel) {
            (Self::F32(p), false) => scorer::score_groups(p, groups),
            (Self::F32(p), true) => scorer::par_score_groups(p, groups),
            (Self::F64(p), false) => scorer::score_groups(p, groups),
            (Self::F64(p), true) => scorer::par_score_groups(p, groups),
        }
    }

    /// The histogram of distances between the first `sample` points.
    pub fn histogram(&self, sample: usize, edges: &BinEdges, parallel: bool) -> Result<DistanceHistogram, EvalError> {
        match (self, parallel) {
            (Self::F32(p), false) => histogram::pointwise_histogram(&p.head(sample), edges),
            (Self::F32(p), true) => histogram::par_pointwise_histogram(&p.head(sample), edges),
            (Self::F64(p), false) => histogram::pointwise_histogram(&p.head(sample), edges),
            (Self::F64(p), true) => histogram::par_pointwise_histogram(&p.head(sample), edges),
        }
    }

    /// The average distance between the first `sample` points.
    pub fn baseline(&self, sample: usize, parallel: bool) -> Result<f64, EvalError> {
        match (self, parallel) {
            (Self::F32(p), false) => kernel::baseline_distance(p, sample),
            (Self::F32(p), true) => kernel::par_baseline_distance(p, sample),
            (Self::F64(p), false) => kernel::baseline_distance(p, sample),
            (Self::F64(p), true) => kernel::par_baseline_distance(p, sample),
        }
    }

    /// The percentile summary of every axis.
    pub fn axes(&self, parallel: bool) -> Vec<AxisSummary> {
        match (self, parallel) {
            (Self::F32(p), false) => axes::axis_summaries(p),
            (Self::F32(p), true) => axes::par_axis_summaries(p),
            (Self::F64(p), false) => axes::axis_summaries(p),
            (Self::F64(p), true) => axes::par_axis_summaries(p),
        }
    }
}

/// A directory holding one embedding per latent dimensionality, named
/// `latent{dim}.npy` or `latent{dim}.csv`.
#[derive(Debug, Clone)]
pub struct LatentDir {
    /// The directory.
    dir: PathBuf,
}

impl LatentDir {
    /// Wraps an existing directory.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, String> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(format!("{} is not a directory", dir.display()));
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// The path of the embedding with `dim` latent dimensions.
    pub fn path_of(&self, dim: usize) -> PathBuf {
        let npy = self.dir.join(format!("latent{dim}.npy"));
        if npy.exists() {
            npy
        } else {
            npy.with_extension("csv")
        }
    }
}

impl io::EmbeddingSource<usize> for LatentDir {
    type Points = ShellPoints;

    fn read_embeddings(&self, dim: &usize) -> Result<ShellPoints, EvalError> {
        let path = self.path_of(*dim);
        ftlog::info!("Reading the {dim}-dimensional embedding from {}", path.display());
        let points = match path.extension().and_then(|s| s.to_str()) {
            Some("npy") => ShellPoints::read_npy(&path)?,
            _ => ShellPoints::read_csv(&path)?,
        };
        ftlog::info!("Read {} points", points.cardinality());
        if points.dimensionality() != *dim {
            ftlog::warn!(
                "{} holds {}-dimensional points, not {dim}",
                path.display(),
                points.dimensionality()
            );
        }
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use latent_eda::{cache::KeyedCache, io::EmbeddingSource};
    use tempdir::TempDir;

    use super::{LatentDir, ShellPoints};

    #[test]
    fn npy_types() -> Result<(), String> {
        let tmp_dir = TempDir::new("shell").map_err(|e| e.to_string())?;

        let single = ndarray::arr2(&[[0.0_f32, 1.0], [2.0, 3.0]]);
        ndarray_npy::write_npy(tmp_dir.path().join("latent2.npy"), &single).map_err(|e| e.to_string())?;
        let double = ndarray::arr2(&[[0.0_f64, 1.0, 2.0], [3.0, 4.0, 5.0]]);
        ndarray_npy::write_npy(tmp_dir.path().join("latent3.npy"), &double).map_err(|e| e.to_string())?;
        std::fs::write(tmp_dir.path().join("latent4.csv"), "1,2,3,4\n5,6,7,8\n9,10,11,12\n")
            .map_err(|e| e.to_string())?;

        let source = LatentDir::new(tmp_dir.path())?;
        let mut cache = KeyedCache::new();

        let points = source.read_cached(&mut cache, &2).map_err(|e| e.to_string())?;
        assert!(matches!(points, ShellPoints::F32(_)));

        let points = source.read_cached(&mut cache, &3).map_err(|e| e.to_string())?;
        assert!(matches!(points, ShellPoints::F64(_)));
        assert_eq!(points.cardinality(), 2);

        let points = source.read_cached(&mut cache, &4).map_err(|e| e.to_string())?;
        assert_eq!(points.cardinality(), 3);
        assert_eq!(points.dimensionality(), 4);

        assert!(source.read_cached(&mut cache, &5).is_err());
        assert_eq!(cache.len(), 3);

        Ok(())
    }

    #[test]
    fn not_a_directory() {
        assert!(LatentDir::new("/definitely/not/here").is_err());
    }
}
