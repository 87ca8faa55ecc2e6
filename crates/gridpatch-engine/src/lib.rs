//! gridpatch_engine - Reference parsing and formula rewriting.

pub mod engine;

#[cfg(test)]
mod tests {
    use crate::engine::*;

    #[test]
    fn test_from_a1_single_letter_columns() {
        let a2 = CellRef::from_a1("A2").unwrap();
        assert_eq!(a2.row, 0);
        assert_eq!(a2.col, 0);

        let b2 = CellRef::from_a1("B2").unwrap();
        assert_eq!(b2.row, 0);
        assert_eq!(b2.col, 1);

        let z2 = CellRef::from_a1("Z2").unwrap();
        assert_eq!(z2.row, 0);
        assert_eq!(z2.col, 25);
    }

    #[test]
    fn test_from_a1_multi_letter_columns() {
        assert_eq!(CellRef::from_a1("AA2").unwrap().col, 26);
        assert_eq!(CellRef::from_a1("AB2").unwrap().col, 27);
        assert_eq!(CellRef::from_a1("AZ2").unwrap().col, 51);
        assert_eq!(CellRef::from_a1("BA2").unwrap().col, 52);
    }

    #[test]
    fn test_from_a1_header_row_not_addressable() {
        // Displayed row 1 is the header row, displayed row 2 is data row 0.
        assert!(CellRef::from_a1("A1").is_none());
        assert!(CellRef::from_a1("A0").is_none());
        assert_eq!(CellRef::from_a1("A2").unwrap().row, 0);
        assert_eq!(CellRef::from_a1("C5").unwrap().row, 3);
    }

    #[test]
    fn test_from_a1_rejects_lowercase_and_junk() {
        assert!(CellRef::from_a1("a2").is_none());
        assert!(CellRef::from_a1("2A").is_none());
        assert!(CellRef::from_a1("").is_none());
        assert!(CellRef::from_a1("A2:B3").is_none());
    }

    #[test]
    fn test_display_round_trip() {
        for raw in ["A2", "Z9", "AA100", "BC42"] {
            let cell = CellRef::from_a1(raw).unwrap();
            assert_eq!(cell.to_string(), raw);
        }
    }

    #[test]
    fn test_column_bijection() {
        for n in 0..=1000usize {
            let letters = index_to_column_letter(n);
            assert_eq!(column_letter_to_index(&letters), Some(n));
        }
    }
}
