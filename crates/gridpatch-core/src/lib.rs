//! gridpatch-core - Document model and change engine.
//!
//! A [`document::Snapshot`] is an immutable (grid, formula index) pair. Edit
//! intents compile to atomic [`document::Change`] records, which apply to a
//! snapshot to produce a new one; [`document::invert`] turns an applied change
//! into its exact undo.

pub mod document;
pub mod error;

pub use document::{
    CellValue, Change, EditAction, FormulaIndex, Grid, Snapshot, TextTransform, cell_key, compile,
    invert,
};
pub use error::{EditError, Result};

pub use gridpatch_engine::engine::CellRef;
