//! How much of each latent axis is in use.

use std::path::Path;

use latent_eda::{axes::count_active_axes, cache::KeyedCache, io, io::EmbeddingSource};

use crate::data::{LatentDir, ShellPoints};

/// Writes `axis_{dim}.csv` to `out_dir` and prints the number of active axes
/// for each of `dims`.
pub fn summarize_axes(
    source: &LatentDir,
    cache: &mut KeyedCache<usize, ShellPoints>,
    dims: &[usize],
    min_iqr: f64,
    out_dir: &Path,
    parallel: bool,
) -> Result<(), String> {
    for &dim in dims {
        let points = source.read_cached(cache, &dim).map_err(|e| e.to_string())?;
        let summaries = points.axes(parallel);
        let active = count_active_axes(&summaries, min_iqr);
        ftlog::info!("{active} of {} axes have an IQR above {min_iqr}", summaries.len());
        println!("dim {dim}: {active} of {} axes active", summaries.len());

        io::write_axis_summaries(&summaries, out_dir.join(format!("axis_{dim}.csv"))).map_err(|e| e.to_string())?;
    }
    Ok(())
}
