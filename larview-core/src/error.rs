//! Error types for larview-core.

use thiserror::Error;

/// Result type alias for larview operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for display composition.
#[derive(Error, Debug)]
pub enum Error {
    /// No raw planes were supplied.
    #[error("no raw planes supplied")]
    EmptyPlaneSet,

    /// Raw planes have inconsistent dimensions.
    #[error("plane {plane} has shape ({rows}, {cols}), expected ({expected_rows}, {expected_cols})")]
    ShapeMismatch {
        plane: usize,
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    /// A channel map entry references a plane outside the supplied sequence.
    #[error("channel map references plane {plane}, but only {count} planes supplied")]
    PlaneOutOfRange { plane: usize, count: usize },
}
