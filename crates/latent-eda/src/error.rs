//! The errors that may arise while loading points and scoring groups.

/// Errors raised by the point store, the group index, the kernels and the
/// report sink.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A source or destination could not be opened, read or written.
    DataUnavailable {
        /// The path or name of the source.
        source: String,
        /// The underlying reason.
        reason: String,
    },
    /// A row of the embedding does not have the dimensionality of the first row.
    ShapeMismatch {
        /// The offending row.
        row: usize,
        /// The dimensionality of the first row.
        expected: usize,
        /// The dimensionality of the offending row.
        actual: usize,
    },
    /// A point holds a NaN or infinite value.
    NonFiniteValue {
        /// The row of the value.
        row: usize,
        /// The column of the value.
        col: usize,
    },
    /// A metadata record is missing fields or has a non-integer index.
    MalformedRecord {
        /// The 1-based line number of the record.
        line: usize,
        /// What is wrong with the record.
        reason: String,
    },
    /// A set has fewer rows than the computation requires.
    EmptySet {
        /// Which set was too small, e.g. "intra-set" or "comparison".
        role: &'static str,
        /// The number of rows in the set.
        rows: usize,
        /// The minimum number of rows required.
        required: usize,
    },
    /// The dimensionality is zero, or two sets disagree on dimensionality.
    InvalidDimension {
        /// The expected dimensionality.
        expected: usize,
        /// The dimensionality that was found.
        actual: usize,
    },
    /// A group has fewer than two members or an empty complement.
    InsufficientGroupSize {
        /// The label of the group.
        label: String,
        /// The number of members in the group.
        members: usize,
        /// The number of points outside the group.
        complement: usize,
    },
    /// A group member is not a row of the point matrix.
    IndexOutOfBounds {
        /// The label of the group.
        label: String,
        /// The offending index.
        index: usize,
        /// The number of points.
        cardinality: usize,
    },
    /// The bin edges are not a strictly increasing sequence of at least two
    /// finite values.
    InvalidBinEdges(String),
    /// Both the intra- and inter-group distances are zero.
    Indistinguishable {
        /// The label of the group.
        label: String,
    },
}

impl EvalError {
    /// Creates a `DataUnavailable` error from a source and anything printable.
    pub fn unavailable<S: AsRef<std::path::Path>, E: std::fmt::Display>(source: S, reason: E) -> Self {
        Self::DataUnavailable {
            source: source.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// A short, stable name for the kind of error.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DataUnavailable { .. } => "DataUnavailable",
            Self::ShapeMismatch { .. } => "ShapeMismatch",
            Self::NonFiniteValue { .. } => "NonFiniteValue",
            Self::MalformedRecord { .. } => "MalformedRecord",
            Self::EmptySet { .. } => "EmptySet",
            Self::InvalidDimension { .. } => "InvalidDimension",
            Self::InsufficientGroupSize { .. } => "InsufficientGroupSize",
            Self::IndexOutOfBounds { .. } => "IndexOutOfBounds",
            Self::InvalidBinEdges(_) => "InvalidBinEdges",
            Self::Indistinguishable { .. } => "Indistinguishable",
        }
    }
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataUnavailable { source, reason } => write!(f, "could not access {source}: {reason}"),
            Self::ShapeMismatch { row, expected, actual } => {
                write!(f, "row {row} has {actual} columns but the first row has {expected}")
            }
            Self::NonFiniteValue { row, col } => write!(f, "non-finite value at row {row}, column {col}"),
            Self::MalformedRecord { line, reason } => write!(f, "malformed metadata record on line {line}: {reason}"),
            Self::EmptySet { role, rows, required } => {
                write!(f, "{role} set has {rows} rows but at least {required} are required")
            }
            Self::InvalidDimension { expected, actual } => {
                write!(f, "invalid dimensionality {actual}, expected {expected}")
            }
            Self::InsufficientGroupSize {
                label,
                members,
                complement,
            } => write!(
                f,
                "group {label:?} has {members} members and {complement} non-members; need at least 2 and 1"
            ),
            Self::IndexOutOfBounds {
                label,
                index,
                cardinality,
            } => write!(f, "group {label:?} refers to index {index} but there are {cardinality} points"),
            Self::InvalidBinEdges(reason) => write!(f, "invalid bin edges: {reason}"),
            Self::Indistinguishable { label } => {
                write!(f, "group {label:?} has zero intra- and inter-group distance")
            }
        }
    }
}

impl std::error::Error for EvalError {}

#[cfg(test)]
mod tests {
    use super::EvalError;

    #[test]
    fn display_has_context() {
        let e = EvalError::InsufficientGroupSize {
            label: "smileys".to_string(),
            members: 1,
            complement: 9,
        };
        let msg = e.to_string();
        assert!(msg.contains("smileys"));
        assert!(msg.contains('1'));
        assert!(msg.contains('9'));
        assert_eq!(e.kind(), "InsufficientGroupSize");
    }
}
