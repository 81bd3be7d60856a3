#![doc = include_str!("../README.md")]

pub mod axes;
pub mod cache;
mod error;
pub mod groups;
pub mod histogram;
pub mod io;
pub mod kernel;
pub mod points;
pub mod scorer;

pub use error::EvalError;
pub use groups::{GroupIndex, IndexSet, MetadataRecord};
pub use histogram::{BinEdges, DistanceHistogram};
pub use points::PointMatrix;
pub use scorer::{SeparationReport, SeparationScore, SkipReason, SkippedGroup};

/// The current version of the crate.
pub const VERSION: &str = "0.1.0";
