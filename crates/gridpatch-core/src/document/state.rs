//! Core data model: cell values, the grid, the formula index, edit intents
//! and atomic change records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{EditError, Result};
use gridpatch_engine::engine::{CellRef, RefError};

/// A single cell value. Formulas are stored as [`CellValue::Text`] beginning
/// with `=`; they are never evaluated here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Infer a value from raw user text: empty -> Null, "true"/"false" ->
    /// Bool, numeric -> Number, anything else -> Text.
    pub fn from_input(input: &str) -> CellValue {
        if input.is_empty() {
            return CellValue::Null;
        }
        match input {
            "true" => return CellValue::Bool(true),
            "false" => return CellValue::Bool(false),
            _ => {}
        }
        if let Ok(n) = input.parse::<f64>() {
            return CellValue::Number(n);
        }
        CellValue::Text(input.to_string())
    }

    /// The formula text if this value is one (text starting with `=`).
    pub fn formula_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(t) if t.starts_with('=') => Some(t),
            _ => None,
        }
    }

    pub fn is_formula(&self) -> bool {
        self.formula_text().is_some()
    }
}

/// The tabular dataset: ordered headers plus rows of cell values.
/// Invariant: every row's length equals `headers.len()`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Grid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Grid {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Grid {
        Grid { headers, rows }
    }

    /// Look up a cell by reference text (e.g. "C2").
    pub fn value_at(&self, reference: &str) -> Result<&CellValue> {
        let cell = CellRef::from_a1(reference).ok_or_else(|| {
            EditError::InvalidReference(RefError::InvalidReference(reference.to_string()))
        })?;
        let row = self.rows.get(cell.row).ok_or(EditError::OutOfBounds {
            axis: "row",
            index: cell.row,
            len: self.rows.len(),
        })?;
        row.get(cell.col).ok_or(EditError::OutOfBounds {
            axis: "column",
            index: cell.col,
            len: self.headers.len(),
        })
    }
}

/// Mapping from a rendered cell reference (e.g. "C2") to formula text.
/// Absence of a key means the cell holds a literal value.
pub type FormulaIndex = BTreeMap<String, String>;

/// The formula index key for a data cell.
pub fn cell_key(row: usize, col: usize) -> String {
    CellRef::new(row, col).to_string()
}

/// An immutable (grid, formula index) pair. Every application of a change
/// list replaces the pair wholesale; undo/redo streams are owned by an
/// external history controller.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(flatten)]
    pub grid: Grid,
    #[serde(default)]
    pub formulas: FormulaIndex,
}

impl Snapshot {
    pub fn new(grid: Grid, formulas: FormulaIndex) -> Snapshot {
        Snapshot { grid, formulas }
    }

    /// Check the row-length invariant on an externally produced snapshot.
    /// Loaders call this before handing the snapshot to the engine; a ragged
    /// row here is malformed input, not an engine defect.
    pub fn validate(&self) -> Result<()> {
        let expected = self.grid.headers.len();
        for (row, cells) in self.grid.rows.iter().enumerate() {
            if cells.len() != expected {
                return Err(EditError::RowLengthMismatch {
                    row,
                    len: cells.len(),
                    expected,
                });
            }
        }
        Ok(())
    }
}

/// Text transform applied to non-formula text cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    Uppercase,
    Lowercase,
    Trim,
}

impl TextTransform {
    pub fn apply(&self, text: &str) -> String {
        match self {
            TextTransform::Uppercase => text.to_uppercase(),
            TextTransform::Lowercase => text.to_lowercase(),
            TextTransform::Trim => text.trim().to_string(),
        }
    }
}

/// A declarative edit intent, as produced by the external (already validated)
/// intent parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EditAction {
    #[serde(rename_all = "camelCase")]
    SetValue { target: String, value: CellValue },
    #[serde(rename_all = "camelCase")]
    SetFormula { target: String, formula: String },
    #[serde(rename_all = "camelCase")]
    TransformText {
        target: String,
        transform_type: TextTransform,
    },
    #[serde(rename_all = "camelCase")]
    DeleteRow { target: String },
    #[serde(rename_all = "camelCase")]
    DeleteColumn { target: String },
    #[serde(rename_all = "camelCase")]
    AddColumn {
        #[serde(default)]
        new_column_name: Option<String>,
        #[serde(default)]
        position: Option<usize>,
        #[serde(default)]
        description: Option<String>,
    },
}

/// One atomic change record. Each variant carries enough prior state to build
/// an exact inverse. Structural changes are indivisible units: a row or
/// column deletion is one record capturing its full prior content, never one
/// record per cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    CellUpdate {
        row: usize,
        col: usize,
        old_value: CellValue,
        new_value: CellValue,
    },
    RowDelete {
        row: usize,
        cells: Vec<(usize, CellValue)>,
    },
    RowInsert {
        row: usize,
        cells: Vec<(usize, CellValue)>,
    },
    ColumnAdd {
        col: usize,
        name: String,
        cells: Vec<(usize, CellValue)>,
    },
    ColumnDelete {
        col: usize,
        name: String,
        cells: Vec<(usize, CellValue)>,
    },
}
