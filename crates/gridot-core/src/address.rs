use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AddressError;

/// Convert column index (0-indexed) to letters (A, B, ..., Z, AA, AB, ...)
pub fn letters_from_col(col: u32) -> String {
    let mut letters = String::new();
    // u64 so that u32::MAX + 1 does not overflow
    let mut n = u64::from(col) + 1;

    while n > 0 {
        n -= 1;
        letters.insert(0, char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }

    letters
}

/// Convert column letters (A, B, ..., Z, AA, AB, ...) to index (0-indexed)
pub fn col_from_letters(letters: &str) -> Result<u32, AddressError> {
    let invalid = || AddressError::InvalidColumn(letters.to_string());

    if letters.is_empty() {
        return Err(invalid());
    }

    let mut col: u64 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(invalid());
        }
        col = col * 26 + u64::from(c.to_ascii_uppercase() as u8 - b'A' + 1);
        if col > u64::from(u32::MAX) + 1 {
            return Err(invalid());
        }
    }

    u32::try_from(col - 1).map_err(|_| invalid())
}

/// Split a token into its leading letters and trailing digits.
/// Returns `None` when anything else appears in the token.
fn split_token(token: &str) -> Option<(&str, &str)> {
    let split = token
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(token.len());
    let (letters, digits) = token.split_at(split);

    if digits.chars().all(|c| c.is_ascii_digit()) {
        Some((letters, digits))
    } else {
        None
    }
}

fn parse_row(digits: &str, token: &str) -> Result<u32, AddressError> {
    match digits.parse::<u32>() {
        Ok(row) if row > 0 => Ok(row),
        _ => Err(AddressError::InvalidRow(token.to_string())),
    }
}

/// Parse a cell token such as `B7` into its address
pub fn parse_cell(token: &str) -> Result<CellAddr, AddressError> {
    token.parse()
}

/// A single cell. Columns are 0-indexed, rows are 1-indexed as written (`A1` is col 0, row 1).
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellAddr {
    pub col: u32,
    pub row: u32,
}

impl CellAddr {
    pub const fn new(col: u32, row: u32) -> Self {
        CellAddr { col, row }
    }

    /// Same column, different row
    pub const fn with_row(self, row: u32) -> Self {
        CellAddr { col: self.col, row }
    }

    /// Same row, different column
    pub const fn with_col(self, col: u32) -> Self {
        CellAddr { col, row: self.row }
    }
}

impl FromStr for CellAddr {
    type Err = AddressError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = || AddressError::InvalidCell(token.to_string());
        let (letters, digits) = split_token(token).ok_or_else(invalid)?;
        if letters.is_empty() || digits.is_empty() {
            return Err(invalid());
        }

        Ok(CellAddr {
            col: col_from_letters(letters)?,
            row: parse_row(digits, token)?,
        })
    }
}

impl fmt::Display for CellAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", letters_from_col(self.col), self.row)
    }
}

impl TryFrom<String> for CellAddr {
    type Error = AddressError;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        token.parse()
    }
}

impl From<CellAddr> for String {
    fn from(addr: CellAddr) -> Self {
        addr.to_string()
    }
}

/// A row reference, written either as a bare row (`5`) or anchored to a column (`A5`)
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RowAnchor {
    row: u32,
    col: Option<u32>,
}

impl RowAnchor {
    pub const fn new(row: u32) -> Self {
        RowAnchor { row, col: None }
    }

    pub const fn at(col: u32, row: u32) -> Self {
        RowAnchor { row, col: Some(col) }
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn col(&self) -> Option<u32> {
        self.col
    }

    /// The same anchor moved to another row
    pub fn with_row(&self, row: u32) -> Self {
        RowAnchor { row, col: self.col }
    }
}

impl FromStr for RowAnchor {
    type Err = AddressError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (letters, digits) =
            split_token(token).ok_or_else(|| AddressError::InvalidRow(token.to_string()))?;
        let col = if letters.is_empty() {
            None
        } else {
            Some(col_from_letters(letters)?)
        };

        Ok(RowAnchor {
            row: parse_row(digits, token)?,
            col,
        })
    }
}

impl fmt::Display for RowAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.col {
            Some(col) => write!(f, "{}{}", letters_from_col(col), self.row),
            None => write!(f, "{}", self.row),
        }
    }
}

impl TryFrom<String> for RowAnchor {
    type Error = AddressError;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        token.parse()
    }
}

impl From<RowAnchor> for String {
    fn from(anchor: RowAnchor) -> Self {
        anchor.to_string()
    }
}

/// A column reference, written either as bare letters (`C`) or anchored to a row (`C3`)
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColAnchor {
    col: u32,
    row: Option<u32>,
}

impl ColAnchor {
    pub const fn new(col: u32) -> Self {
        ColAnchor { col, row: None }
    }

    pub const fn at(col: u32, row: u32) -> Self {
        ColAnchor { col, row: Some(row) }
    }

    pub fn col(&self) -> u32 {
        self.col
    }

    pub fn row(&self) -> Option<u32> {
        self.row
    }

    /// The same anchor moved to another column
    pub fn with_col(&self, col: u32) -> Self {
        ColAnchor { col, row: self.row }
    }
}

impl FromStr for ColAnchor {
    type Err = AddressError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (letters, digits) =
            split_token(token).ok_or_else(|| AddressError::InvalidColumn(token.to_string()))?;
        let row = if digits.is_empty() {
            None
        } else {
            Some(parse_row(digits, token)?)
        };

        Ok(ColAnchor {
            col: col_from_letters(letters)?,
            row,
        })
    }
}

impl fmt::Display for ColAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "{}{}", letters_from_col(self.col), row),
            None => write!(f, "{}", letters_from_col(self.col)),
        }
    }
}

impl TryFrom<String> for ColAnchor {
    type Error = AddressError;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        token.parse()
    }
}

impl From<ColAnchor> for String {
    fn from(anchor: ColAnchor) -> Self {
        anchor.to_string()
    }
}

/// Whether a token addresses more than one cell, row or column
pub fn is_range(token: &str) -> bool {
    token.contains(':')
}

fn split_range(token: &str) -> Result<(&str, &str), AddressError> {
    let mut parts = token.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(start), Some(end), None) => Ok((start, end)),
        _ => Err(AddressError::NotARange(token.to_string())),
    }
}

/// An inclusive rectangle of cells (e.g., A1:B10)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub start: CellAddr,
    pub end: CellAddr,
}

impl CellRange {
    pub fn new(start: CellAddr, end: CellAddr) -> Self {
        // Normalize so start is top-left and end is bottom-right
        CellRange {
            start: CellAddr::new(start.col.min(end.col), start.row.min(end.row)),
            end: CellAddr::new(start.col.max(end.col), start.row.max(end.row)),
        }
    }

    /// Parse `A1:B3` notation
    pub fn parse(token: &str) -> Result<Self, AddressError> {
        let (start, end) = split_range(token)?;
        Ok(CellRange::new(start.parse()?, end.parse()?))
    }

    pub fn col_count(&self) -> u64 {
        u64::from(self.end.col - self.start.col) + 1
    }

    pub fn row_count(&self) -> u64 {
        u64::from(self.end.row - self.start.row) + 1
    }

    pub fn cell_count(&self) -> u64 {
        self.col_count() * self.row_count()
    }

    /// Iterate column by column: every row of the first column, then the next column
    pub fn cells(&self) -> ColumnMajorIter {
        ColumnMajorIter {
            range: *self,
            col: u64::from(self.start.col),
            row: u64::from(self.start.row),
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// Iterator over the cells of a range in column-major order
pub struct ColumnMajorIter {
    range: CellRange,
    col: u64,
    row: u64,
}

impl Iterator for ColumnMajorIter {
    type Item = CellAddr;

    fn next(&mut self) -> Option<Self::Item> {
        if self.col > u64::from(self.range.end.col) {
            return None;
        }

        let addr = CellAddr::new(self.col as u32, self.row as u32);

        self.row += 1;
        if self.row > u64::from(self.range.end.row) {
            self.row = u64::from(self.range.start.row);
            self.col += 1;
        }

        Some(addr)
    }
}

/// A run of rows such as `A2:A5` or `2:5`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    first: RowAnchor,
    last: u32,
}

impl RowRange {
    pub fn parse(token: &str) -> Result<Self, AddressError> {
        let (start, end) = split_range(token)?;
        let start: RowAnchor = start.parse()?;
        let end: RowAnchor = end.parse()?;
        let (low, high) = (start.row.min(end.row), start.row.max(end.row));

        Ok(RowRange {
            first: start.with_row(low),
            last: high,
        })
    }

    pub fn row_count(&self) -> u64 {
        u64::from(self.last - self.first.row) + 1
    }

    /// Highest row first, so sequential deletes never disturb rows still to come
    pub fn anchors(&self) -> impl Iterator<Item = RowAnchor> + '_ {
        (self.first.row..=self.last)
            .rev()
            .map(move |row| self.first.with_row(row))
    }
}

/// A run of columns such as `B1:D1` or `B:D`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColRange {
    first: ColAnchor,
    last: u32,
}

impl ColRange {
    pub fn parse(token: &str) -> Result<Self, AddressError> {
        let (start, end) = split_range(token)?;
        let start: ColAnchor = start.parse()?;
        let end: ColAnchor = end.parse()?;
        let (low, high) = (start.col.min(end.col), start.col.max(end.col));

        Ok(ColRange {
            first: start.with_col(low),
            last: high,
        })
    }

    pub fn col_count(&self) -> u64 {
        u64::from(self.last - self.first.col) + 1
    }

    /// Highest column first, so sequential deletes never disturb columns still to come
    pub fn anchors(&self) -> impl Iterator<Item = ColAnchor> + '_ {
        (self.first.col..=self.last)
            .rev()
            .map(move |col| self.first.with_col(col))
    }
}

/// Expand `A1:B2` into `A1, A2, B1, B2`
///
/// ```
/// use gridot_core::address::expand_range;
///
/// let cells: Vec<String> = expand_range("A1:B2")
///     .unwrap()
///     .iter()
///     .map(|c| c.to_string())
///     .collect();
/// assert_eq!(cells, ["A1", "A2", "B1", "B2"]);
/// ```
pub fn expand_range(token: &str) -> Result<Vec<CellAddr>, AddressError> {
    Ok(CellRange::parse(token)?.cells().collect())
}

/// Expand `A2:A4` into `A4, A3, A2`
pub fn expand_row_range(token: &str) -> Result<Vec<RowAnchor>, AddressError> {
    Ok(RowRange::parse(token)?.anchors().collect())
}

/// Expand `B1:D1` into `D1, C1, B1`
pub fn expand_col_range(token: &str) -> Result<Vec<ColAnchor>, AddressError> {
    Ok(ColRange::parse(token)?.anchors().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_from_col() {
        assert_eq!(letters_from_col(0), "A");
        assert_eq!(letters_from_col(25), "Z");
        assert_eq!(letters_from_col(26), "AA");
        assert_eq!(letters_from_col(27), "AB");
        assert_eq!(letters_from_col(701), "ZZ");
        assert_eq!(letters_from_col(702), "AAA");
    }

    #[test]
    fn test_col_from_letters() {
        assert_eq!(col_from_letters("A"), Ok(0));
        assert_eq!(col_from_letters("Z"), Ok(25));
        assert_eq!(col_from_letters("AA"), Ok(26));
        assert_eq!(col_from_letters("ab"), Ok(27));
        assert_eq!(col_from_letters("ZZ"), Ok(701));
        assert!(col_from_letters("").is_err());
        assert!(col_from_letters("A1").is_err());
    }

    #[test]
    fn test_column_round_trip() {
        for n in (0..20_000).chain([u32::MAX - 1, u32::MAX]) {
            assert_eq!(col_from_letters(&letters_from_col(n)), Ok(n));
        }
    }

    #[test]
    fn test_column_overflow() {
        let past_max = letters_from_col(u32::MAX);
        assert!(col_from_letters(&format!("{}A", past_max)).is_err());
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("A1"), Ok(CellAddr::new(0, 1)));
        assert_eq!(parse_cell("b7"), Ok(CellAddr::new(1, 7)));
        assert_eq!(parse_cell("AA100").unwrap().to_string(), "AA100");

        assert!(matches!(parse_cell("A"), Err(AddressError::InvalidCell(_))));
        assert!(matches!(parse_cell("12"), Err(AddressError::InvalidCell(_))));
        assert!(matches!(parse_cell("A1B"), Err(AddressError::InvalidCell(_))));
        assert!(matches!(parse_cell("A0"), Err(AddressError::InvalidRow(_))));
    }

    #[test]
    fn test_row_anchor_forms() {
        let anchored: RowAnchor = "A5".parse().unwrap();
        assert_eq!(anchored.row(), 5);
        assert_eq!(anchored.col(), Some(0));
        assert_eq!(anchored.to_string(), "A5");

        let bare: RowAnchor = "5".parse().unwrap();
        assert_eq!(bare.col(), None);
        assert_eq!(bare.to_string(), "5");

        assert!("A".parse::<RowAnchor>().is_err());
    }

    #[test]
    fn test_col_anchor_forms() {
        let bare: ColAnchor = "C".parse().unwrap();
        assert_eq!(bare.col(), 2);
        assert_eq!(bare.to_string(), "C");

        let anchored: ColAnchor = "c3".parse().unwrap();
        assert_eq!(anchored.row(), Some(3));
        assert_eq!(anchored.to_string(), "C3");

        assert!("3".parse::<ColAnchor>().is_err());
    }

    #[test]
    fn test_expand_range_column_major() {
        let cells: Vec<String> = expand_range("A1:B3")
            .unwrap()
            .into_iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(cells, ["A1", "A2", "A3", "B1", "B2", "B3"]);
    }

    #[test]
    fn test_expand_range_normalizes() {
        assert_eq!(expand_range("B2:A1").unwrap(), expand_range("A1:B2").unwrap());
        assert_eq!(CellRange::parse("A1:C4").unwrap().cell_count(), 12);
    }

    #[test]
    fn test_expand_range_rejects_non_ranges() {
        assert!(matches!(expand_range("A1"), Err(AddressError::NotARange(_))));
        assert!(matches!(expand_range("A1:B2:C3"), Err(AddressError::NotARange(_))));
    }

    #[test]
    fn test_expand_row_range_descending() {
        let rows: Vec<String> = expand_row_range("A2:A4")
            .unwrap()
            .into_iter()
            .map(|r| r.to_string())
            .collect();
        assert_eq!(rows, ["A4", "A3", "A2"]);

        let bare: Vec<String> = expand_row_range("4:2")
            .unwrap()
            .into_iter()
            .map(|r| r.to_string())
            .collect();
        assert_eq!(bare, ["4", "3", "2"]);
    }

    #[test]
    fn test_expand_col_range_descending() {
        let cols: Vec<String> = expand_col_range("B1:D1")
            .unwrap()
            .into_iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(cols, ["D1", "C1", "B1"]);

        assert_eq!(ColRange::parse("A:Z").unwrap().col_count(), 26);
        assert_eq!(RowRange::parse("A4:A2").unwrap().row_count(), 3);
    }
}
