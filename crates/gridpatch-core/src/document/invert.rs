//! The inverse generator.
//!
//! Every change record carries the prior state it destroyed, so inversion is
//! a value-level swap: applying a change and then its inverse restores the
//! original (grid, formula index) pair exactly. Redo needs no algorithm of
//! its own; it re-applies the original forward list.
//!
//! Inverses of a multi-change batch must be applied in reverse order of the
//! forward list.
//!
//! One caveat is inherent to reference rewriting: a formula in *another* row
//! that collapsed to `#REF!` during a structural delete cannot be resurrected
//! from the change record alone, since `#REF!` tokens carry no memory of what
//! they pointed at. Callers wanting bit-exact undo across that case keep the
//! pre-delete snapshot alongside the change.

use super::state::Change;

/// Build the exact inverse of a single applied change.
pub fn invert(change: &Change) -> Change {
    match change {
        Change::CellUpdate {
            row,
            col,
            old_value,
            new_value,
        } => Change::CellUpdate {
            row: *row,
            col: *col,
            old_value: new_value.clone(),
            new_value: old_value.clone(),
        },
        Change::RowDelete { row, cells } => Change::RowInsert {
            row: *row,
            cells: cells.clone(),
        },
        Change::RowInsert { row, cells } => Change::RowDelete {
            row: *row,
            cells: cells.clone(),
        },
        Change::ColumnAdd { col, name, cells } => Change::ColumnDelete {
            col: *col,
            name: name.clone(),
            cells: cells.clone(),
        },
        Change::ColumnDelete { col, name, cells } => Change::ColumnAdd {
            col: *col,
            name: name.clone(),
            cells: cells.clone(),
        },
    }
}
