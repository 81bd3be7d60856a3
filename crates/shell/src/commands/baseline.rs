//! The average distance between points, without any grouping.

use latent_eda::{cache::KeyedCache, io::EmbeddingSource};

use crate::data::{LatentDir, ShellPoints};

/// Prints `dim,average` for each of `dims`.
pub fn print_baselines(
    source: &LatentDir,
    cache: &mut KeyedCache<usize, ShellPoints>,
    dims: &[usize],
    sample: usize,
    parallel: bool,
) -> Result<(), String> {
    for &dim in dims {
        let points = source.read_cached(cache, &dim).map_err(|e| e.to_string())?;
        let average = points.baseline(sample, parallel).map_err(|e| e.to_string())?;
        ftlog::info!("Baseline for dim {dim} over {sample} points: {average}");
        println!("{dim},{average}");
    }
    Ok(())
}
