use thiserror::Error;

/// Errors returned by dependence measures in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Input columns have zero length.
    #[error("Empty array")]
    EmptyInput,

    /// Two columns passed together differ in length.
    #[error("Array sizes do not match: expected {expected}, found {found}")]
    SizeMismatch {
        /// Length of the first column.
        expected: usize,
        /// Length of the offending column.
        found: usize,
    },

    /// Batch computation with fewer than two columns.
    #[error("Need at least two columns to compute dependence measures, found {found}")]
    TooFewColumns {
        /// Number of columns passed.
        found: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// NaN values in the input of a Monte-Carlo measure.
    #[error("NaN values are not allowed by this implementation")]
    NaNInput,

    /// A statistical test kept returning NaN during Monte-Carlo sampling.
    #[error("too many NaNs: statistical test failed after {retries} retries")]
    TooManyNaNs {
        /// Retries spent before giving up.
        retries: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Malformed input file content.
    #[error("{0}")]
    Parse(String),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
