//! Error handling.

use ndarray::ShapeError;
use thiserror::Error;

/// Aggregation engine error type
///
/// This type encapsulates the various errors that may occur while opening,
/// reconciling and concatenating profile records.
#[derive(Debug, Error)]
pub enum AggregationError {
    /// Attempt to aggregate with no input records
    #[error("cannot aggregate an empty corpus")]
    EmptyCorpus,

    /// Structural invariant violation in a freshly opened record
    #[error("record {identifier} is not structurally valid")]
    RecordInvalid {
        identifier: String,
        #[source]
        source: validator::ValidationErrors,
    },

    /// No shared dimension matches the concatenation axis registry
    #[error("no shared dimension is a recognised concatenation axis")]
    NoAxisDimension,

    /// More than one shared dimension matches the concatenation axis registry
    #[error("dimensions {first} and {second} both claim the concatenation axis role")]
    AmbiguousAxisDimension { first: String, second: String },

    /// Padded records are not mutually consistent
    #[error("variable {variable} is inconsistent across padded records: {detail}")]
    ShapeMismatch { variable: String, detail: String },

    /// Validity mask does not cover the data array
    #[error("mask shape {mask:?} does not match data shape {data:?}")]
    MaskMismatch { data: Vec<usize>, mask: Vec<usize> },

    /// Error creating an ndarray array from a shape
    #[error("failed to create array from shape")]
    ShapeInvalid(#[from] ShapeError),

    /// Error reading a record from its source
    #[error("failed to read record")]
    Io(#[from] std::io::Error),

    /// Error decoding a record document
    #[error("failed to decode record document")]
    Json(#[from] serde_json::Error),
}
