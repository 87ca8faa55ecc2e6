//! Cell reference parsing and formatting.
//!
//! Converts between spreadsheet-style references (e.g., "A2", "B7", "AA100")
//! and zero-indexed data coordinates. Displayed row 1 is always the header row
//! and is never addressable: data row 0 renders as displayed row 2.
//!
//! # Examples
//!
//! ```ignore
//! let cell = CellRef::from_a1("B3").unwrap();
//! assert_eq!(cell.col, 1);  // 0-indexed
//! assert_eq!(cell.row, 1);  // displayed row 3 -> data row 1
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rows displayed to users are 1-based and row 1 is the header, so the first
/// data row renders as displayed row 2.
pub const DISPLAY_ROW_OFFSET: usize = 2;

/// A reference to a data cell by row and column indices (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse a strict A1-style reference (uppercase letters, displayed row >= 2).
    /// Returns None if the input is invalid or addresses the header row.
    pub fn from_a1(name: &str) -> Option<CellRef> {
        let re = Regex::new(r"^(?<letters>[A-Z]+)(?<numbers>[0-9]+)$").unwrap();
        let caps = re.captures(name)?;
        let col = column_letter_to_index(&caps["letters"])?;
        let row = caps["numbers"]
            .parse::<usize>()
            .ok()?
            .checked_sub(DISPLAY_ROW_OFFSET)?;
        Some(CellRef::new(row, col))
    }

    /// The displayed (1-based, header-inclusive) row number for this cell.
    pub fn displayed_row(&self) -> usize {
        self.row + DISPLAY_ROW_OFFSET
    }
}

/// Convert column letters to a zero-based index (A -> 0, Z -> 25, AA -> 26).
/// Returns None on empty/non-uppercase input or overflow.
pub fn column_letter_to_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut acc = 0usize;
    for b in letters.bytes() {
        if !b.is_ascii_uppercase() {
            return None;
        }
        let digit = (b - b'A') as usize + 1;
        acc = acc.checked_mul(26)?.checked_add(digit)?;
    }
    acc.checked_sub(1)
}

/// Convert a zero-based column index to letters (0 -> A, 25 -> Z, 26 -> AA).
pub fn index_to_column_letter(col: usize) -> String {
    let mut result = String::new();
    let mut n = col as u128 + 1;
    while n > 0 {
        n -= 1;
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    result
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            index_to_column_letter(self.col),
            self.displayed_row()
        )
    }
}
