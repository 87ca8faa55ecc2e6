//! Error types for gridpatch core.
//!
//! The compiler and the change-application engine never return these across
//! their API boundary for malformed input: a bad target compiles to zero
//! changes and out-of-range indices are dropped per-index. The enum exists
//! for accessors and loaders that do want to report what went wrong.

use thiserror::Error;

use gridpatch_engine::engine::RefError;

/// Errors that can occur in the gridpatch document layer.
#[derive(Error, Debug)]
pub enum EditError {
    #[error("{0}")]
    InvalidReference(#[from] RefError),

    #[error("{axis} index {index} out of bounds (len {len})")]
    OutOfBounds {
        axis: &'static str,
        index: usize,
        len: usize,
    },

    #[error("row {row} has {len} cells, expected {expected}")]
    RowLengthMismatch {
        row: usize,
        len: usize,
        expected: usize,
    },
}

pub type Result<T> = std::result::Result<T, EditError>;
