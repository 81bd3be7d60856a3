//! CLI for separation scores and distance diagnostics of latent embeddings.

mod commands;
mod data;
mod utils;

use std::path::PathBuf;

use clap::Parser;

use commands::Commands;
use latent_eda::{cache::KeyedCache, BinEdges};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The directory for log files.
    #[arg(long, global = true, default_value = "logs")]
    log_dir: PathBuf,

    /// Whether to use the parallel versions of the computations.
    #[arg(short('p'), long, global = true, default_value_t = false)]
    parallel: bool,

    /// The number of threads for the parallel computations. Defaults to the
    /// number of cores.
    #[arg(short('t'), long, global = true)]
    threads: Option<usize>,

    /// The subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<(), String> {
    let args = Args::parse();

    let log_name = format!("latent-eda-{}", args.command.name());
    let (_guard, log_path) = utils::configure_logger(&args.log_dir, &log_name)?;
    println!("Log file: {log_path:?}");

    ftlog::info!("{args:?}");

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| e.to_string())?;
        ftlog::info!("Using {threads} threads");
    }
    let parallel = args.parallel;

    let mut cache = KeyedCache::new();

    match args.command {
        Commands::Score {
            inp_dir,
            dim,
            metadata,
            column,
            out_path,
            skipped,
            details,
        } => {
            let source = data::LatentDir::new(inp_dir)?;
            commands::score::score_groups(
                &source, &mut cache, dim, metadata, column, out_path, skipped, details, parallel,
            )?;
        }
        Commands::Histogram {
            inp_dir,
            dims,
            sample,
            start,
            stop,
            step,
            out_dir,
        } => {
            let source = data::LatentDir::new(inp_dir)?;
            let edges = BinEdges::uniform(start, stop, step).map_err(|e| e.to_string())?;
            let out_dir = utils::ensure_dir(out_dir)?;
            commands::histogram::write_histograms(&source, &mut cache, &dims, sample, &edges, &out_dir, parallel)?;
        }
        Commands::Baseline { inp_dir, dims, sample } => {
            let source = data::LatentDir::new(inp_dir)?;
            commands::baseline::print_baselines(&source, &mut cache, &dims, sample, parallel)?;
        }
        Commands::Axes {
            inp_dir,
            dims,
            min_iqr,
            out_dir,
        } => {
            let source = data::LatentDir::new(inp_dir)?;
            let out_dir = utils::ensure_dir(out_dir)?;
            commands::axes::summarize_axes(&source, &mut cache, &dims, min_iqr, &out_dir, parallel)?;
        }
    }

    ftlog::info!("Done.");

    Ok(())
}
