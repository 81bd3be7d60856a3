//! Histograms of pairwise distances.

use std::path::Path;

use latent_eda::{cache::KeyedCache, io, io::EmbeddingSource, BinEdges};

use crate::data::{LatentDir, ShellPoints};

/// Writes `dist_{dim}.csv` to `out_dir` for each of `dims`.
pub fn write_histograms(
    source: &LatentDir,
    cache: &mut KeyedCache<usize, ShellPoints>,
    dims: &[usize],
    sample: usize,
    edges: &BinEdges,
    out_dir: &Path,
    parallel: bool,
) -> Result<(), String> {
    for &dim in dims {
        let points = source.read_cached(cache, &dim).map_err(|e| e.to_string())?;
        let hist = points.histogram(sample, edges, parallel).map_err(|e| e.to_string())?;
        ftlog::info!("Binned {} distances for dim {dim}, {} outside the edges", hist.total(), hist.outside);

        io::write_histogram(&hist, out_dir.join(format!("dist_{dim}.csv"))).map_err(|e| e.to_string())?;
    }
    Ok(())
}
