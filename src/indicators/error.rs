//! Input errors raised at the engine boundary.
//!
//! Short windows are not errors: every indicator degrades to a neutral or
//! default value instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("column {column} has {actual} values, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("price window is empty")]
    EmptyWindow,

    #[error("malformed candle at index {index}: {reason}")]
    MalformedCandle { index: usize, reason: String },

    #[error("timestamps must be strictly ascending (index {index})")]
    UnorderedTimestamps { index: usize },

    #[error("invalid numeric value for {field}: {value}")]
    InvalidNumericValue { field: String, value: f64 },

    #[error("invalid input format: {0}")]
    InvalidFormat(String),

    #[error("invalid prediction: {0}")]
    InvalidPrediction(String),
}
