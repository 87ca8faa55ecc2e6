//! gridpatch - Edit-intent engine for tabular data.
//!
//! Re-exports the document model from `gridpatch-core` and the reference
//! primitives from `gridpatch-engine` for embedding.

pub use gridpatch_core::{
    CellRef, CellValue, Change, EditAction, EditError, FormulaIndex, Grid, Snapshot,
    TextTransform, cell_key, compile, invert,
};
pub use gridpatch_engine::engine::{
    Axis, DeltaOp, REF_ERROR, StructuralDelta, Target, column_letter_to_index,
    index_to_column_letter, parse_target, rewrite_formula,
};
