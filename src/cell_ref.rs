//! Utilities for encoding and decoding spreadsheet-style cell references and ranges.
//!
//! References are 1-based on both axes: `A1` is `(row 1, col 1)`, `AA10` is
//! `(row 10, col 27)`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, XlplanError};
use crate::types::MergeRegion;

/// A 1-based (row, column) position in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self.row, self.col))
    }
}

impl FromStr for CellRef {
    type Err = XlplanError;

    fn from_str(s: &str) -> Result<Self> {
        decode(s)
    }
}

/// Convert a 1-based column number to its letter form (`1` -> `A`, `27` -> `AA`).
///
/// Column `0` has no letter form and yields an empty string.
pub fn column_letters(col: u32) -> String {
    let mut letters = Vec::new();
    let mut n = col;
    while n > 0 {
        let rem = (n - 1) % 26;
        // rem < 26, so the sum always fits in a u8
        letters.push(char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Encode a 1-based (row, col) pair as a reference like `"B12"`.
pub fn encode(row: u32, col: u32) -> String {
    let mut out = column_letters(col);
    out.push_str(&row.to_string());
    out
}

/// Decode a reference like `"B12"` into a [`CellRef`].
///
/// The input must be one or more uppercase ASCII letters followed by one or
/// more ASCII digits, nothing else. Absolute markers (`$`), lowercase letters,
/// whitespace, row `0` and values that overflow `u32` are rejected.
pub fn decode(reference: &str) -> Result<CellRef> {
    let invalid = || XlplanError::InvalidReference(reference.to_string());

    let bytes = reference.as_bytes();
    let letter_count = bytes.iter().take_while(|b| b.is_ascii_uppercase()).count();
    let (letters, digits) = bytes.split_at(letter_count);

    if letters.is_empty() || digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }

    let mut col: u32 = 0;
    for &b in letters {
        col = col
            .checked_mul(26)
            .and_then(|c| c.checked_add(u32::from(b - b'A') + 1))
            .ok_or_else(invalid)?;
    }

    let mut row: u32 = 0;
    for &b in digits {
        row = row
            .checked_mul(10)
            .and_then(|r| r.checked_add(u32::from(b - b'0')))
            .ok_or_else(invalid)?;
    }

    if row == 0 {
        return Err(invalid());
    }

    Ok(CellRef { row, col })
}

/// Parse a range like `"A1:C3"` (or a single reference like `"B2"`) into a
/// [`MergeRegion`]. Reversed corners are normalized.
pub fn parse_range(range: &str) -> Result<MergeRegion> {
    match range.split_once(':') {
        Some((start, end)) => {
            let start = decode(start.trim())?;
            let end = decode(end.trim())?;
            Ok(MergeRegion::new(start.row, start.col, end.row, end.col))
        }
        None => {
            let cell = decode(range.trim())?;
            Ok(MergeRegion::new(cell.row, cell.col, cell.row, cell.col))
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(1, 1, "A1")]
    #[test_case(12, 2, "B12")]
    #[test_case(1, 26, "Z1")]
    #[test_case(3, 27, "AA3")]
    #[test_case(7, 52, "AZ7")]
    #[test_case(1, 702, "ZZ1")]
    #[test_case(1048576, 16384, "XFD1048576")]
    fn encodes_and_decodes(row: u32, col: u32, expected: &str) {
        assert_eq!(encode(row, col), expected);
        assert_eq!(decode(expected).unwrap(), CellRef::new(row, col));
    }

    #[test_case("1A")]
    #[test_case("A-1")]
    #[test_case("")]
    #[test_case("A")]
    #[test_case("12")]
    #[test_case("a1")]
    #[test_case("$A$1")]
    #[test_case("A1 ")]
    #[test_case("A0")]
    #[test_case("A99999999999")]
    fn rejects_malformed(input: &str) {
        let err = decode(input).unwrap_err();
        assert!(matches!(err, XlplanError::InvalidReference(ref s) if s == input));
    }

    #[test]
    fn column_letters_of_zero_is_empty() {
        assert_eq!(column_letters(0), "");
    }

    #[test]
    fn parses_ranges() {
        let region = parse_range("B2:D3").unwrap();
        assert_eq!(region, MergeRegion::new(2, 2, 3, 4));

        let reversed = parse_range("D3:B2").unwrap();
        assert_eq!(reversed, region);

        let single = parse_range("C5").unwrap();
        assert_eq!(single, MergeRegion::new(5, 3, 5, 3));

        assert!(parse_range("B2:").is_err());
    }

    #[test]
    fn display_and_from_str_agree() {
        let cell: CellRef = "AB14".parse().unwrap();
        assert_eq!(cell, CellRef::new(14, 28));
        assert_eq!(cell.to_string(), "AB14");
    }
}
