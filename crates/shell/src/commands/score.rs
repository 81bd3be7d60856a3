//! Ranking labelled groups by their separation scores.

use std::path::Path;

use latent_eda::{cache::KeyedCache, io, io::EmbeddingSource, EvalError, GroupIndex};

use crate::data::{LatentDir, ShellPoints};

/// Scores every group of the metadata in the `dim`-dimensional embedding and
/// writes the ranking.
///
/// The optional reports are written before the ranking. If any report fails,
/// those already written are removed.
#[allow(clippy::too_many_arguments)]
pub fn score_groups<P: AsRef<Path>>(
    source: &LatentDir,
    cache: &mut KeyedCache<usize, ShellPoints>,
    dim: usize,
    metadata: P,
    column: usize,
    out_path: P,
    skipped_path: Option<P>,
    details_path: Option<P>,
    parallel: bool,
) -> Result<(), String> {
    let records = io::read_metadata(metadata).map_err(|e| e.to_string())?;
    let groups = GroupIndex::build(&records, column).map_err(|e| e.to_string())?;
    ftlog::info!("Found {} labels in column {column}", groups.len());

    let points = source.read_cached(cache, &dim).map_err(|e| e.to_string())?;
    let report = points.score(&groups, parallel);
    ftlog::info!("Scored {} groups and skipped {}", report.ranked.len(), report.skipped.len());

    if let Some(best) = report.ranked.first() {
        println!("Best separated: {} ({})", best.label, best.score());
    }

    let mut written = Vec::new();
    let result = (|| -> Result<(), EvalError> {
        if let Some(path) = skipped_path.as_ref() {
            io::write_skipped(&report.skipped, path)?;
            written.push(path.as_ref().to_path_buf());
        }
        if let Some(path) = details_path.as_ref() {
            io::write_score_details(&report.ranked, path)?;
            written.push(path.as_ref().to_path_buf());
        }
        io::write_ranked_scores(&report.ranked, &out_path)
    })();

    if let Err(e) = result {
        for path in written {
            ftlog::warn!("Removing {} after a failed run", path.display());
            if let Err(rm) = std::fs::remove_file(&path) {
                ftlog::warn!("Could not remove {}: {rm}", path.display());
            }
        }
        return Err(e.to_string());
    }

    Ok(())
}
