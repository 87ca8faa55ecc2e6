//! The change-application engine.
//!
//! `Snapshot::apply` consumes an ordered change list and produces a brand new
//! (grid, formula index) pair; the input snapshot is never touched. On every
//! structural change the engine splices the grid, then rewrites and re-keys
//! every surviving formula in one pass so the index and its mirrored grid
//! cells stay consistent.

use super::state::{CellValue, Change, EditAction, Snapshot, cell_key};
use gridpatch_engine::engine::{
    Axis, CellRef, DeltaOp, StructuralDelta, rewrite_formula,
};

impl Snapshot {
    /// Compile an edit intent against this snapshot's grid.
    pub fn compile(&self, action: &EditAction) -> Vec<Change> {
        super::compile(&self.grid, action)
    }

    /// Apply an ordered change list, returning the resulting snapshot.
    ///
    /// Structural deletes are applied in descending index order among
    /// themselves so earlier splices cannot invalidate later indices within
    /// the same batch; all other changes keep their supplied order.
    pub fn apply(&self, changes: &[Change]) -> Snapshot {
        let mut next = self.clone();
        for change in order_changes(changes) {
            next.apply_one(&change);
        }
        next.assert_consistent();
        next
    }

    fn apply_one(&mut self, change: &Change) {
        match change {
            Change::CellUpdate {
                row,
                col,
                new_value,
                ..
            } => {
                self.set_cell(*row, *col, new_value.clone());
            }
            Change::RowDelete { row, .. } => {
                if *row >= self.grid.rows.len() {
                    return;
                }
                self.grid.rows.remove(*row);
                self.shift_formulas(StructuralDelta::new(Axis::Row, DeltaOp::Delete, *row));
            }
            Change::RowInsert { row, cells } => {
                let at = (*row).min(self.grid.rows.len());
                self.grid
                    .rows
                    .insert(at, vec![CellValue::Null; self.grid.headers.len()]);
                self.shift_formulas(StructuralDelta::new(Axis::Row, DeltaOp::Insert, at));
                for (col, value) in cells {
                    self.set_cell(at, *col, value.clone());
                }
            }
            Change::ColumnAdd { col, name, cells } => {
                let at = (*col).min(self.grid.headers.len());
                self.grid.headers.insert(at, name.clone());
                // Existing rows backfill with Null.
                for cells in &mut self.grid.rows {
                    cells.insert(at.min(cells.len()), CellValue::Null);
                }
                self.shift_formulas(StructuralDelta::new(Axis::Col, DeltaOp::Insert, at));
                for (row, value) in cells {
                    self.set_cell(*row, at, value.clone());
                }
            }
            Change::ColumnDelete { col, .. } => {
                if *col >= self.grid.headers.len() {
                    return;
                }
                self.grid.headers.remove(*col);
                for cells in &mut self.grid.rows {
                    if *col < cells.len() {
                        cells.remove(*col);
                    }
                }
                self.shift_formulas(StructuralDelta::new(Axis::Col, DeltaOp::Delete, *col));
            }
        }
    }

    /// The single mutation entry point for one cell: a `=`-prefixed text goes
    /// to both the grid and the formula index; anything else clears a
    /// pre-existing index entry and writes the literal.
    fn set_cell(&mut self, row: usize, col: usize, value: CellValue) {
        if col >= self.grid.headers.len() {
            return;
        }
        let Some(slot) = self
            .grid
            .rows
            .get_mut(row)
            .and_then(|cells| cells.get_mut(col))
        else {
            return;
        };
        let key = cell_key(row, col);
        match value.formula_text() {
            Some(text) => {
                self.formulas.insert(key, text.to_string());
            }
            None => {
                self.formulas.remove(&key);
            }
        }
        *slot = value;
    }

    /// Rewrite and re-key every formula for one structural change, updating
    /// the mirrored grid cells in the same pass. Entries whose own cell was
    /// deleted drop out; a formula that degraded to the bare `#REF!` literal
    /// leaves the index and stays in the grid as text.
    fn shift_formulas(&mut self, delta: StructuralDelta) {
        let old = std::mem::take(&mut self.formulas);
        for (key, text) in old {
            let Some(cell) = CellRef::from_a1(&key) else {
                continue;
            };
            let Some(moved) = delta.shift(cell) else {
                continue;
            };
            if moved.row >= self.grid.rows.len() || moved.col >= self.grid.headers.len() {
                continue;
            }
            let rewritten = rewrite_formula(&text, delta);
            if rewritten.starts_with('=') {
                self.formulas.insert(moved.to_string(), rewritten.clone());
            }
            if let Some(slot) = self
                .grid
                .rows
                .get_mut(moved.row)
                .and_then(|cells| cells.get_mut(moved.col))
            {
                *slot = CellValue::Text(rewritten);
            }
        }
    }

    /// Post-condition checks; a violation is a programming defect, not an
    /// input error, so debug builds fail fast here.
    fn assert_consistent(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        for (i, row) in self.grid.rows.iter().enumerate() {
            debug_assert_eq!(
                row.len(),
                self.grid.headers.len(),
                "row {i} length diverged from headers"
            );
        }
        for (key, text) in &self.formulas {
            debug_assert!(text.starts_with('='), "formula index entry {key} is not a formula");
            let cell = CellRef::from_a1(key);
            debug_assert!(cell.is_some(), "unparsable formula index key {key}");
            if let Some(cell) = cell {
                let mirrored = self
                    .grid
                    .rows
                    .get(cell.row)
                    .and_then(|row| row.get(cell.col));
                debug_assert_eq!(
                    mirrored,
                    Some(&CellValue::Text(text.clone())),
                    "formula index entry {key} lost its grid mirror"
                );
            }
        }
    }
}

/// Reorder a change batch per the engine's ordering rule: `RowDelete`s sort
/// descending among themselves, `ColumnDelete`s likewise; everything else
/// keeps its position.
fn order_changes(changes: &[Change]) -> Vec<Change> {
    let mut ordered = changes.to_vec();
    sort_deletes_descending(&mut ordered, |change| match change {
        Change::RowDelete { row, .. } => Some(*row),
        _ => None,
    });
    sort_deletes_descending(&mut ordered, |change| match change {
        Change::ColumnDelete { col, .. } => Some(*col),
        _ => None,
    });
    ordered
}

fn sort_deletes_descending<F>(changes: &mut [Change], index_of: F)
where
    F: Fn(&Change) -> Option<usize>,
{
    let slots: Vec<usize> = (0..changes.len())
        .filter(|&i| index_of(&changes[i]).is_some())
        .collect();
    let mut subset: Vec<Change> = slots.iter().map(|&i| changes[i].clone()).collect();
    subset.sort_by_key(|change| std::cmp::Reverse(index_of(change).unwrap_or(0)));
    for (slot, change) in slots.into_iter().zip(subset) {
        changes[slot] = change;
    }
}
