//! Formula reference rewriting.
//!
//! When a row or column is inserted or deleted, every stored formula must have
//! its cell references shifted to keep pointing at the same data. References
//! into the deleted slice become the literal `#REF!`.
//!
//! Formulas are rewritten as text only; nothing here evaluates them.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::cell_ref::{CellRef, DISPLAY_ROW_OFFSET, column_letter_to_index, index_to_column_letter};

/// Marker substituted for a reference whose cell no longer exists.
pub const REF_ERROR: &str = "#REF!";

/// Which axis a structural change touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Row,
    Col,
}

/// Whether the slice at [`StructuralDelta::at`] was inserted or deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaOp {
    Insert,
    Delete,
}

/// One structural change: a single row or column inserted or deleted at a
/// zero-based data index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralDelta {
    pub axis: Axis,
    pub op: DeltaOp,
    pub at: usize,
}

impl StructuralDelta {
    pub fn new(axis: Axis, op: DeltaOp, at: usize) -> StructuralDelta {
        StructuralDelta { axis, op, at }
    }

    /// Where a cell lands after this change. None means the cell itself was
    /// deleted.
    pub fn shift(&self, cell: CellRef) -> Option<CellRef> {
        let idx = match self.axis {
            Axis::Row => cell.row,
            Axis::Col => cell.col,
        };
        let shifted = match self.op {
            DeltaOp::Insert => {
                if idx >= self.at {
                    idx + 1
                } else {
                    idx
                }
            }
            DeltaOp::Delete => {
                if idx == self.at {
                    return None;
                } else if idx > self.at {
                    idx - 1
                } else {
                    idx
                }
            }
        };
        Some(match self.axis {
            Axis::Row => CellRef::new(shifted, cell.col),
            Axis::Col => CellRef::new(cell.row, shifted),
        })
    }
}

/// Rewrite every cell reference in `formula` for one structural change.
///
/// Rules:
/// - Tokens matching `\$?[A-Z]+\$?\d+` outside double-quoted string spans are
///   treated as references only when bounded by non-alphanumeric characters,
///   so `SUM(` is never mistaken for one.
/// - A reference into the deleted slice becomes `#REF!`; everything at or
///   past an insert shifts by one. `$` anchors are preserved.
/// - Tokens that do not decode to a data cell (e.g. header-row "A1", column
///   overflow) pass through unchanged. `#REF!` is never reprocessed.
/// - A formula that collapses to exactly `=#REF!` degrades to the bare
///   `#REF!` literal; it is no longer a formula.
pub fn rewrite_formula(formula: &str, delta: StructuralDelta) -> String {
    let rewritten = map_refs_outside_strings(formula, |token_start, seg, caps| {
        rewrite_token(token_start, seg, caps, delta)
    });
    if rewritten == format!("={REF_ERROR}") {
        return REF_ERROR.to_string();
    }
    rewritten
}

fn rewrite_token(
    token_start: usize,
    seg: &str,
    caps: &regex::Captures,
    delta: StructuralDelta,
) -> String {
    let whole = &caps[0];
    let token_end = token_start + whole.len();

    // Reject tokens glued to identifiers on either side.
    let bounded_left = seg[..token_start]
        .chars()
        .next_back()
        .is_none_or(|c| !c.is_ascii_alphanumeric());
    let bounded_right = seg[token_end..]
        .chars()
        .next()
        .is_none_or(|c| !c.is_ascii_alphanumeric());
    if !bounded_left || !bounded_right {
        return whole.to_string();
    }

    let col_anchor = &caps[1];
    let letters = &caps[2];
    let row_anchor = &caps[3];
    let digits = &caps[4];

    let Some(col) = column_letter_to_index(letters) else {
        return whole.to_string();
    };
    let Some(row) = digits
        .parse::<usize>()
        .ok()
        .and_then(|d| d.checked_sub(DISPLAY_ROW_OFFSET))
    else {
        return whole.to_string();
    };

    match delta.shift(CellRef::new(row, col)) {
        None => REF_ERROR.to_string(),
        Some(cell) => format!(
            "{col_anchor}{}{row_anchor}{}",
            index_to_column_letter(cell.col),
            cell.displayed_row()
        ),
    }
}

/// Run `map` over every reference-shaped token outside double-quoted string
/// spans, leaving quoted text untouched.
fn map_refs_outside_strings<F>(formula: &str, map: F) -> String
where
    F: Fn(usize, &str, &regex::Captures) -> String,
{
    let token_re = Regex::new(r"(\$?)([A-Z]+)(\$?)([0-9]+)").unwrap();

    let map_segment = |seg: &str| {
        token_re
            .replace_all(seg, |caps: &regex::Captures| {
                let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
                map(start, seg, caps)
            })
            .to_string()
    };

    let bytes = formula.as_bytes();
    let mut out = String::new();
    let mut seg_start = 0;
    let mut in_string = false;
    let mut backslashes = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            if b == b'\\' {
                backslashes += 1;
                i += 1;
                continue;
            }
            if b == b'"' && backslashes.is_multiple_of(2) {
                out.push_str(&formula[seg_start..=i]);
                in_string = false;
                seg_start = i + 1;
            }
            backslashes = 0;
            i += 1;
            continue;
        }

        if b == b'"' {
            out.push_str(&map_segment(&formula[seg_start..i]));
            in_string = true;
            seg_start = i;
            backslashes = 0;
            i += 1;
            continue;
        }

        i += 1;
    }

    if seg_start < formula.len() {
        if in_string {
            out.push_str(&formula[seg_start..]);
        } else {
            out.push_str(&map_segment(&formula[seg_start..]));
        }
    }

    out
}
