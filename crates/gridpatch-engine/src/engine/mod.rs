//! Reference engine API.
//!
//! This module provides the pure, leaf-level pieces of the edit engine:
//!
//! - [`CellRef`] - Cell reference parsing (A1 notation ↔ row/col indices)
//! - [`Target`] / [`parse_target`] - Edit-target grammar (cell, range, column, row set)
//! - [`StructuralDelta`] / [`rewrite_formula`] - Formula reference rewriting on
//!   row/column insert or delete

mod cell_ref;
mod rewrite;
mod target;

pub use cell_ref::{CellRef, DISPLAY_ROW_OFFSET, column_letter_to_index, index_to_column_letter};
pub use rewrite::{Axis, DeltaOp, REF_ERROR, StructuralDelta, rewrite_formula};
pub use target::{RefError, Target, parse_target};
