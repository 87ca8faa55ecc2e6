//! Document state and change logic (UI-agnostic).

mod apply;
mod compile;
mod invert;
mod state;

pub use compile::compile;
pub use invert::invert;
pub use state::{
    CellValue, Change, EditAction, FormulaIndex, Grid, Snapshot, TextTransform, cell_key,
};
