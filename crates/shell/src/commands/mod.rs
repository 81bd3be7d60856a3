//! The commands under the `shell` CLI.

pub mod axes;
pub mod baseline;
pub mod histogram;
pub mod score;

use std::path::PathBuf;

use clap::Subcommand;

/// The number of points sampled when a command does not say otherwise.
const DEFAULT_SAMPLE: &str = "1000";

/// The reports the shell can produce.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score how well each labelled group stands apart from the other points.
    Score {
        /// The directory with the `latent{dim}` embeddings.
        #[arg(short('d'), long)]
        inp_dir: PathBuf,

        /// The latent dimensionality of the embedding to score.
        #[arg(long)]
        dim: usize,

        /// The metadata file, whose first column is the item index.
        #[arg(short('m'), long)]
        metadata: PathBuf,

        /// The column of the metadata holding the labels.
        #[arg(short('c'), long, default_value = "1")]
        column: usize,

        /// Where to write the ranked `label,score` rows.
        #[arg(short('o'), long)]
        out_path: PathBuf,

        /// Where to write the skipped groups and the reasons.
        #[arg(long)]
        skipped: Option<PathBuf>,

        /// Where to write the average distances behind each score.
        #[arg(long)]
        details: Option<PathBuf>,
    },
    /// Histograms of the distances between points.
    Histogram {
        /// The directory with the `latent{dim}` embeddings.
        #[arg(short('d'), long)]
        inp_dir: PathBuf,

        /// The latent dimensionalities to use.
        #[arg(long, num_args = 1.., required = true)]
        dims: Vec<usize>,

        /// The number of points, from the start of each embedding, to use.
        #[arg(short('k'), long, default_value = DEFAULT_SAMPLE)]
        sample: usize,

        /// The lower edge of the first bin.
        #[arg(long, default_value = "0.0")]
        start: f64,

        /// The upper edge of the last bin.
        #[arg(long, default_value = "20.0")]
        stop: f64,

        /// The width of each bin.
        #[arg(long, default_value = "0.5")]
        step: f64,

        /// The directory in which to write `dist_{dim}.csv`.
        #[arg(short('o'), long)]
        out_dir: PathBuf,
    },
    /// The average distance between points, per dimensionality.
    Baseline {
        /// The directory with the `latent{dim}` embeddings.
        #[arg(short('d'), long)]
        inp_dir: PathBuf,

        /// The latent dimensionalities to use.
        #[arg(long, num_args = 1.., required = true)]
        dims: Vec<usize>,

        /// The number of points, from the start of each embedding, to use.
        #[arg(short('k'), long, default_value = DEFAULT_SAMPLE)]
        sample: usize,
    },
    /// Percentiles of each axis, and how many axes are in use.
    Axes {
        /// The directory with the `latent{dim}` embeddings.
        #[arg(short('d'), long)]
        inp_dir: PathBuf,

        /// The latent dimensionalities to use.
        #[arg(long, num_args = 1.., required = true)]
        dims: Vec<usize>,

        /// The inter-quartile range above which an axis counts as used.
        #[arg(long, default_value_t = latent_eda::axes::DEFAULT_MIN_IQR)]
        min_iqr: f64,

        /// The directory in which to write `axis_{dim}.csv`.
        #[arg(short('o'), long)]
        out_dir: PathBuf,
    },
}

impl Commands {
    /// A short name for the command, used to name the log file.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Score { .. } => "score",
            Self::Histogram { .. } => "histogram",
            Self::Baseline { .. } => "baseline",
            Self::Axes { .. } => "axes",
        }
    }
}
