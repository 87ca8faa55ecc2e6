//! The action compiler: turns one edit intent plus a grid snapshot into an
//! ordered list of atomic change records.
//!
//! The compiler is pure and forgiving: it never mutates the grid and never
//! fails on malformed input. A target that does not parse, or an intent too
//! under-specified to act on, compiles to an empty list; indices outside the
//! grid are dropped per-index while the rest of the batch proceeds.

use regex::Regex;

use super::state::{CellValue, Change, EditAction, Grid};
use gridpatch_engine::engine::{DISPLAY_ROW_OFFSET, Target, parse_target};

/// Token in a formula intent replaced with the displayed row number of each
/// target cell, so one intent can fill a whole column of row-relative
/// formulas.
const ROW_TOKEN: &str = "{row}";

/// Compile an edit intent into atomic changes against the given grid.
pub fn compile(grid: &Grid, action: &EditAction) -> Vec<Change> {
    match action {
        EditAction::SetValue { target, value } => {
            compile_value_write(grid, target, |_row| value.clone())
        }
        EditAction::SetFormula { target, formula } => compile_value_write(grid, target, |row| {
            let displayed = row + DISPLAY_ROW_OFFSET;
            CellValue::Text(formula.replace(ROW_TOKEN, &displayed.to_string()))
        }),
        EditAction::TransformText {
            target,
            transform_type,
        } => {
            let Ok(target) = parse_target(target) else {
                return Vec::new();
            };
            let mut changes = Vec::new();
            for (row, col) in resolve_cells(grid, &target) {
                let Some(old) = grid.rows.get(row).and_then(|cells| cells.get(col)) else {
                    continue;
                };
                // Only plain text is transformed; formulas and non-text
                // values pass untouched.
                let CellValue::Text(text) = old else { continue };
                if old.is_formula() {
                    continue;
                }
                let transformed = transform_type.apply(text);
                if transformed != *text {
                    changes.push(Change::CellUpdate {
                        row,
                        col,
                        old_value: old.clone(),
                        new_value: CellValue::Text(transformed),
                    });
                }
            }
            changes
        }
        EditAction::DeleteRow { target } => {
            let Ok(target) = parse_target(target) else {
                return Vec::new();
            };
            let mut rows = requested_rows(&target);
            rows.retain(|&row| row < grid.rows.len());
            rows.sort_unstable();
            rows.dedup();
            // Descending so earlier splices cannot shift later indices.
            rows.reverse();
            rows.into_iter()
                .map(|row| Change::RowDelete {
                    row,
                    cells: snapshot_row(grid, row),
                })
                .collect()
        }
        EditAction::DeleteColumn { target } => {
            let Some(col) = resolve_column(grid, target) else {
                return Vec::new();
            };
            vec![Change::ColumnDelete {
                col,
                name: grid.headers[col].clone(),
                cells: snapshot_column(grid, col),
            }]
        }
        EditAction::AddColumn {
            new_column_name,
            position,
            description,
        } => {
            let name = new_column_name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .or_else(|| description.as_deref().and_then(extract_column_name));
            let Some(name) = name else {
                return Vec::new();
            };
            let col = position.unwrap_or(grid.headers.len()).min(grid.headers.len());
            vec![Change::ColumnAdd {
                col,
                name,
                cells: Vec::new(),
            }]
        }
    }
}

fn compile_value_write<F>(grid: &Grid, target: &str, value_for_row: F) -> Vec<Change>
where
    F: Fn(usize) -> CellValue,
{
    let Ok(target) = parse_target(target) else {
        return Vec::new();
    };
    resolve_cells(grid, &target)
        .into_iter()
        .filter_map(|(row, col)| {
            // A row shorter than the header count (possible in snapshots the
            // caller has not validated) just skips the missing cell.
            let old_value = grid.rows.get(row)?.get(col)?.clone();
            Some(Change::CellUpdate {
                row,
                col,
                old_value,
                new_value: value_for_row(row),
            })
        })
        .collect()
}

/// Every in-bounds (row, col) the target addresses, in row-major order.
/// Indices beyond the grid are skipped, never grown into.
fn resolve_cells(grid: &Grid, target: &Target) -> Vec<(usize, usize)> {
    let row_count = grid.rows.len();
    let col_count = grid.headers.len();
    match target {
        Target::Cell(cell) => {
            if cell.row < row_count && cell.col < col_count {
                vec![(cell.row, cell.col)]
            } else {
                Vec::new()
            }
        }
        Target::Range(start, end) => {
            let mut cells = Vec::new();
            for row in start.row..=end.row.min(row_count.saturating_sub(1)) {
                for col in start.col..=end.col.min(col_count.saturating_sub(1)) {
                    if row < row_count && col < col_count {
                        cells.push((row, col));
                    }
                }
            }
            cells
        }
        Target::Column(col) => {
            if *col < col_count {
                (0..row_count).map(|row| (row, *col)).collect()
            } else {
                Vec::new()
            }
        }
        Target::Rows(rows) => {
            let mut cells = Vec::new();
            for &row in rows {
                if row < row_count {
                    for col in 0..col_count {
                        cells.push((row, col));
                    }
                }
            }
            cells
        }
    }
}

/// Row indices a deletion target asks for, before bounds filtering.
fn requested_rows(target: &Target) -> Vec<usize> {
    match target {
        Target::Rows(rows) => rows.iter().copied().collect(),
        Target::Cell(cell) => vec![cell.row],
        Target::Range(start, end) => (start.row..=end.row).collect(),
        Target::Column(_) => Vec::new(),
    }
}

/// Resolve a column-deletion target: a column letter, or an exact
/// case-sensitive header name.
fn resolve_column(grid: &Grid, target: &str) -> Option<usize> {
    if let Ok(Target::Column(col)) = parse_target(target) {
        if col < grid.headers.len() {
            return Some(col);
        }
        // A letter past the last column may still name a header verbatim.
    }
    grid.headers.iter().position(|h| h == target.trim())
}

fn snapshot_row(grid: &Grid, row: usize) -> Vec<(usize, CellValue)> {
    grid.rows[row]
        .iter()
        .enumerate()
        .map(|(col, value)| (col, value.clone()))
        .collect()
}

fn snapshot_column(grid: &Grid, col: usize) -> Vec<(usize, CellValue)> {
    grid.rows
        .iter()
        .enumerate()
        .map(|(row, cells)| (row, cells.get(col).cloned().unwrap_or_default()))
        .collect()
}

/// Best-effort column name extraction from free text, e.g.
/// `add a column called "City"`. Explicitly non-guaranteed.
fn extract_column_name(description: &str) -> Option<String> {
    let quoted = Regex::new(r#"(?i)(?:called|named)\s+["']([^"']+)["']"#).unwrap();
    if let Some(caps) = quoted.captures(description) {
        return Some(caps[1].trim().to_string());
    }
    let bare = Regex::new(r"(?i)(?:called|named)\s+([A-Za-z0-9_-]+)").unwrap();
    bare.captures(description)
        .map(|caps| caps[1].trim().to_string())
}
