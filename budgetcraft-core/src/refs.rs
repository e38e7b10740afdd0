//! A1-notation cell references and ranges

use std::fmt;

/// A single cell position, 0-based row and column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    /// Parse a cell reference like "A1" into 0-based indices
    pub fn parse(cell_ref: &str) -> Option<Self> {
        let mut col = 0u32;
        let mut row_str = String::new();
        let mut seen_letter = false;

        for ch in cell_ref.trim().chars() {
            if ch.is_ascii_alphabetic() {
                // Letters after the row digits mean a malformed reference
                if !row_str.is_empty() {
                    return None;
                }
                col = col * 26 + (ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
                seen_letter = true;
            } else if ch.is_ascii_digit() {
                row_str.push(ch);
            } else {
                return None;
            }
        }

        if !seen_letter || row_str.is_empty() {
            return None;
        }

        let row = row_str.parse::<u32>().ok()?;
        if row == 0 {
            return None;
        }

        Some(Self {
            row: row - 1,
            col: col - 1,
        })
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut letters = String::new();
        let mut n = self.col + 1;
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.insert(0, (b'A' + rem as u8) as char);
            n = (n - 1) / 26;
        }
        write!(f, "{}{}", letters, self.row + 1)
    }
}

/// A rectangular cell range, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub start: CellRef,
    pub end: CellRef,
}

impl CellRange {
    /// Parse a range like "A1:N300"
    pub fn parse(range: &str) -> Option<Self> {
        let (start, end) = range.split_once(':')?;
        let start = CellRef::parse(start)?;
        let end = CellRef::parse(end)?;
        if end.row < start.row || end.col < start.col {
            return None;
        }
        Some(Self { start, end })
    }

    pub fn n_rows(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    pub fn n_cols(&self) -> u32 {
        self.end.col - self.start.col + 1
    }

    pub fn contains(&self, cell: CellRef) -> bool {
        cell.row >= self.start.row
            && cell.row <= self.end.row
            && cell.col >= self.start.col
            && cell.col <= self.end.col
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(CellRef::parse("A1"), Some(CellRef { row: 0, col: 0 }));
        assert_eq!(CellRef::parse("B2"), Some(CellRef { row: 1, col: 1 }));
        assert_eq!(CellRef::parse("Z26"), Some(CellRef { row: 25, col: 25 }));
        assert_eq!(CellRef::parse("AA1"), Some(CellRef { row: 0, col: 26 }));
        assert_eq!(CellRef::parse("AB10"), Some(CellRef { row: 9, col: 27 }));
    }

    #[test]
    fn test_parse_cell_ref_rejects_malformed() {
        assert_eq!(CellRef::parse(""), None);
        assert_eq!(CellRef::parse("A"), None);
        assert_eq!(CellRef::parse("12"), None);
        assert_eq!(CellRef::parse("A0"), None);
        assert_eq!(CellRef::parse("1A"), None);
        assert_eq!(CellRef::parse("A1:B2"), None);
    }

    #[test]
    fn test_parse_cell_range() {
        let range = CellRange::parse("A1:N300").unwrap();
        assert_eq!(range.start, CellRef { row: 0, col: 0 });
        assert_eq!(range.end, CellRef { row: 299, col: 13 });
        assert_eq!(range.n_rows(), 300);
        assert_eq!(range.n_cols(), 14);
    }

    #[test]
    fn test_parse_cell_range_rejects_inverted() {
        assert_eq!(CellRange::parse("B2:A1"), None);
        assert_eq!(CellRange::parse("A1"), None);
    }

    #[test]
    fn test_range_contains() {
        let range = CellRange::parse("B2:D4").unwrap();
        assert!(range.contains(CellRef::parse("B2").unwrap()));
        assert!(range.contains(CellRef::parse("C3").unwrap()));
        assert!(!range.contains(CellRef::parse("A1").unwrap()));
        assert!(!range.contains(CellRef::parse("E4").unwrap()));
    }

    #[test]
    fn test_display_round_trip() {
        for s in ["A1", "Z26", "AA1", "AB10"] {
            assert_eq!(CellRef::parse(s).unwrap().to_string(), s);
        }
        assert_eq!(CellRange::parse("A1:N300").unwrap().to_string(), "A1:N300");
    }
}
