//! Edit-target grammar.
//!
//! A target string addresses what an edit applies to: a single cell ("C3"),
//! a rectangular range ("A2:C5"), a whole column ("B"), or a set of displayed
//! rows ("3,5-7"). Anything else is an [`RefError::InvalidReference`].

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use super::cell_ref::{CellRef, DISPLAY_ROW_OFFSET, column_letter_to_index};

/// Errors from target parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefError {
    #[error("invalid cell reference: {0}")]
    InvalidReference(String),
}

/// A parsed edit target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// A single data cell.
    Cell(CellRef),
    /// A rectangular range, normalized so start <= end on both axes.
    Range(CellRef, CellRef),
    /// An entire column by zero-based index.
    Column(usize),
    /// A set of zero-based data row indices, de-duplicated.
    Rows(BTreeSet<usize>),
}

/// Parse a target string into a [`Target`].
///
/// Row tokens are displayed row numbers; displayed row 1 is the header and is
/// never addressable, so "A1" is invalid and row-list entries below 2 are
/// dropped. A row list with no surviving entries is an error.
pub fn parse_target(raw: &str) -> Result<Target, RefError> {
    let trimmed = raw.trim();
    let invalid = || RefError::InvalidReference(raw.to_string());

    let cell_re = Regex::new(r"^[A-Z]+\d+$").unwrap();
    let range_re = Regex::new(r"^([A-Z]+\d+):([A-Z]+\d+)$").unwrap();
    let column_re = Regex::new(r"^[A-Z]+$").unwrap();
    let rows_re = Regex::new(r"^\d+([,-]\d+)*$").unwrap();

    if cell_re.is_match(trimmed) {
        return CellRef::from_a1(trimmed).map(Target::Cell).ok_or_else(invalid);
    }

    if let Some(caps) = range_re.captures(trimmed) {
        let start = CellRef::from_a1(&caps[1]).ok_or_else(invalid)?;
        let end = CellRef::from_a1(&caps[2]).ok_or_else(invalid)?;
        // Normalize so iteration is always top-left to bottom-right.
        let top = CellRef::new(start.row.min(end.row), start.col.min(end.col));
        let bottom = CellRef::new(start.row.max(end.row), start.col.max(end.col));
        return Ok(Target::Range(top, bottom));
    }

    if column_re.is_match(trimmed) {
        return column_letter_to_index(trimmed)
            .map(Target::Column)
            .ok_or_else(invalid);
    }

    // Row lists tolerate whitespace around separators: "3, 5 - 7".
    let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    if rows_re.is_match(&compact) {
        let rows = parse_row_list(&compact).ok_or_else(invalid)?;
        if rows.is_empty() {
            return Err(invalid());
        }
        return Ok(Target::Rows(rows));
    }

    Err(invalid())
}

fn parse_row_list(compact: &str) -> Option<BTreeSet<usize>> {
    let mut rows = BTreeSet::new();
    for piece in compact.split(',') {
        let bounds: Vec<&str> = piece.split('-').collect();
        match bounds.as_slice() {
            [single] => {
                let displayed = single.parse::<usize>().ok()?;
                if let Some(row) = displayed.checked_sub(DISPLAY_ROW_OFFSET) {
                    rows.insert(row);
                }
            }
            [start, end] => {
                let a = start.parse::<usize>().ok()?;
                let b = end.parse::<usize>().ok()?;
                for displayed in a.min(b)..=a.max(b) {
                    if let Some(row) = displayed.checked_sub(DISPLAY_ROW_OFFSET) {
                        rows.insert(row);
                    }
                }
            }
            _ => return None,
        }
    }
    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_cell() {
        assert_eq!(
            parse_target("C3").unwrap(),
            Target::Cell(CellRef::new(1, 2))
        );
    }

    #[test]
    fn test_parse_range_normalizes_order() {
        let target = parse_target("C5:A2").unwrap();
        assert_eq!(
            target,
            Target::Range(CellRef::new(0, 0), CellRef::new(3, 2))
        );
    }

    #[test]
    fn test_parse_column() {
        assert_eq!(parse_target("B").unwrap(), Target::Column(1));
        assert_eq!(parse_target("AA").unwrap(), Target::Column(26));
    }

    #[test]
    fn test_parse_row_list_dedupes_and_spans() {
        let target = parse_target("3, 5-7, 5").unwrap();
        let Target::Rows(rows) = target else {
            panic!("expected rows target");
        };
        // Displayed 3,5,6,7 -> data 1,3,4,5.
        assert_eq!(rows.into_iter().collect::<Vec<_>>(), vec![1, 3, 4, 5]);
    }

    #[test]
    fn test_parse_row_list_drops_header_rows() {
        let Target::Rows(rows) = parse_target("1-3").unwrap() else {
            panic!("expected rows target");
        };
        // Displayed 1 (header) is dropped, 2 and 3 survive as data 0 and 1.
        assert_eq!(rows.into_iter().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_parse_row_list_all_invalid_is_error() {
        assert!(parse_target("1").is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for raw in ["", "1A", "A1:B", "hello", "A2:B1:C3", "3-", "a2"] {
            assert!(parse_target(raw).is_err(), "should reject {raw:?}");
        }
        // Header-row cell references are invalid even though they match the grammar.
        assert!(parse_target("B1").is_err());
        assert!(parse_target("A1:B3").is_err());
    }
}
