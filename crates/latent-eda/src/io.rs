//! Reading embeddings and metadata, and writing reports.
//!
//! Every report writer is atomic: records go to a sibling `.partial` file that
//! is renamed over the destination only once everything has been flushed. A
//! run that fails part-way leaves no report behind.

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use distances::Number;
use serde::Serialize;

use crate::{
    axes::AxisSummary, cache::KeyedCache, DistanceHistogram, EvalError, MetadataRecord, PointMatrix,
    SeparationScore, SkippedGroup,
};

/// Something that produces the embedding for a given configuration, e.g. a
/// latent dimensionality.
pub trait EmbeddingSource<K> {
    /// The type of the loaded embedding.
    type Points;

    /// Reads the embedding identified by `key`.
    ///
    /// # Errors
    ///
    /// * `DataUnavailable` if the embedding cannot be read.
    /// * `ShapeMismatch` if the embedding is not rectangular.
    fn read_embeddings(&self, key: &K) -> Result<Self::Points, EvalError>;

    /// Reads the embedding for `key` through `cache`, so that it is loaded at
    /// most once per cache.
    ///
    /// # Errors
    ///
    /// See [`EmbeddingSource::read_embeddings`].
    fn read_cached<'c>(
        &self,
        cache: &'c mut KeyedCache<K, Self::Points>,
        key: &K,
    ) -> Result<&'c Self::Points, EvalError>
    where
        K: Eq + std::hash::Hash + Clone,
    {
        cache.get_or_create(key, |k| self.read_embeddings(k))
    }
}

/// Reads a 2-d array of points from a `.npy` file.
///
/// # Errors
///
/// * `DataUnavailable` if the file cannot be read, or does not hold a 2-d
///   array of `T`.
/// * `EmptySet`, `InvalidDimension` or `NonFiniteValue` if the array is not a
///   valid point matrix.
pub fn read_npy<T, P>(path: P) -> Result<PointMatrix<T>, EvalError>
where
    T: Number + ndarray_npy::ReadableElement,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let arr: ndarray::Array2<T> = ndarray_npy::read_npy(path).map_err(|e| EvalError::unavailable(path, e))?;
    ftlog::info!("Read {:?} array from {}", arr.dim(), path.display());
    let dimensionality = arr.ncols();
    PointMatrix::from_flat(arr.iter().copied().collect(), dimensionality)
}

/// Reads points from a headerless `.csv` file with one point per line.
///
/// # Errors
///
/// * `DataUnavailable` if the file cannot be read or a field is not a number.
/// * `ShapeMismatch` if lines have different numbers of fields.
pub fn read_csv<T: Number, P: AsRef<Path>>(path: P) -> Result<PointMatrix<T>, EvalError> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| EvalError::unavailable(path, e))?;

    let rows = reader
        .records()
        .map(|record| {
            let record = record.map_err(|e| EvalError::unavailable(path, e))?;
            let line = record.position().map_or(0, csv::Position::line);
            record
                .iter()
                .map(|field| {
                    field.trim().parse::<T>().map_err(|_| {
                        EvalError::unavailable(path, format!("line {line}: {field:?} is not a number"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    ftlog::info!("Read {} rows from {}", rows.len(), path.display());

    PointMatrix::new(rows)
}

/// Reads the raw metadata records from a `.csv` file.
///
/// The header row, if any, is returned like any other record; the group index
/// recognizes and skips it.
///
/// # Errors
///
/// * `DataUnavailable` if the file cannot be read.
pub fn read_metadata<P: AsRef<Path>>(path: P) -> Result<Vec<MetadataRecord>, EvalError> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| EvalError::unavailable(path, e))?;

    let records = reader
        .records()
        .enumerate()
        .map(|(i, record)| {
            let record = record.map_err(|e| EvalError::unavailable(path, e))?;
            let line = record.position().map_or(i + 1, |p| p.line() as usize);
            Ok(MetadataRecord::new(line, record.iter()))
        })
        .collect::<Result<Vec<_>, EvalError>>()?;
    ftlog::info!("Read {} metadata records from {}", records.len(), path.display());

    Ok(records)
}

/// The sibling path to which a report is written before it is renamed.
fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "report".to_string(), |n| n.to_string_lossy().to_string());
    path.with_file_name(format!("{name}.partial"))
}

/// Writes a csv report atomically.
fn write_atomically<P, F>(path: P, has_headers: bool, write: F) -> Result<(), EvalError>
where
    P: AsRef<Path>,
    F: FnOnce(&mut csv::Writer<File>) -> Result<(), csv::Error>,
{
    let path = path.as_ref();
    let partial = partial_path(path);

    let result = csv::WriterBuilder::new()
        .has_headers(has_headers)
        .from_path(&partial)
        .and_then(|mut writer| {
            write(&mut writer)?;
            writer.flush()?;
            Ok(())
        });

    match result {
        Ok(()) => {
            std::fs::rename(&partial, path).map_err(|e| EvalError::unavailable(path, e))?;
            ftlog::info!("Wrote {}", path.display());
            Ok(())
        }
        Err(e) => {
            if partial.exists() {
                if let Err(rm) = std::fs::remove_file(&partial) {
                    ftlog::warn!("Could not remove {}: {rm}", partial.display());
                }
            }
            Err(EvalError::unavailable(path, e))
        }
    }
}

/// Writes `label,score` rows, without a header, in the given order.
///
/// # Errors
///
/// * `DataUnavailable` if the file cannot be written.
pub fn write_ranked_scores<P: AsRef<Path>>(records: &[SeparationScore], path: P) -> Result<(), EvalError> {
    write_atomically(path, false, |w| {
        records
            .iter()
            .try_for_each(|s| w.serialize((s.label.as_str(), s.score())))
    })
}

/// Writes every field of the score records, with a header, in the given order.
///
/// # Errors
///
/// * `DataUnavailable` if the file cannot be written.
pub fn write_score_details<P: AsRef<Path>>(records: &[SeparationScore], path: P) -> Result<(), EvalError> {
    write_atomically(path, true, |w| records.iter().try_for_each(|s| w.serialize(s)))
}

/// Writes `label,reason` rows, without a header, for the skipped groups.
///
/// # Errors
///
/// * `DataUnavailable` if the file cannot be written.
pub fn write_skipped<P: AsRef<Path>>(skipped: &[SkippedGroup], path: P) -> Result<(), EvalError> {
    write_atomically(path, false, |w| {
        skipped
            .iter()
            .try_for_each(|s| w.serialize((s.label.as_str(), s.reason.to_string())))
    })
}

/// One bin of a histogram, as written to csv.
#[derive(Serialize)]
struct HistogramRow {
    /// The lower edge of the bin.
    lower: f64,
    /// The upper edge of the bin.
    upper: f64,
    /// The number of distances in the bin.
    count: u64,
}

/// Writes one `lower,upper,count` row per bin, with a header.
///
/// # Errors
///
/// * `DataUnavailable` if the file cannot be written.
pub fn write_histogram<P: AsRef<Path>>(histogram: &DistanceHistogram, path: P) -> Result<(), EvalError> {
    if histogram.outside > 0 {
        ftlog::info!("{} distances fell outside the bin edges", histogram.outside);
    }
    write_atomically(path, true, |w| {
        histogram
            .bins()
            .try_for_each(|(lower, upper, count)| w.serialize(HistogramRow { lower, upper, count }))
    })
}

/// Writes one row per axis with its summary statistics, with a header.
///
/// # Errors
///
/// * `DataUnavailable` if the file cannot be written.
pub fn write_axis_summaries<P: AsRef<Path>>(summaries: &[AxisSummary], path: P) -> Result<(), EvalError> {
    write_atomically(path, true, |w| summaries.iter().try_for_each(|s| w.serialize(s)))
}

#[cfg(test)]
mod tests {
    use super::{partial_path, read_csv};
    use crate::EvalError;

    #[test]
    fn partial_is_a_sibling() {
        let p = partial_path(std::path::Path::new("/tmp/out/scores.csv"));
        assert_eq!(p, std::path::Path::new("/tmp/out/scores.csv.partial"));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            read_csv::<f32, _>("/definitely/not/here.csv"),
            Err(EvalError::DataUnavailable { .. })
        ));
    }
}
