//! Range-notation parsing ("A1:B5").

use serde::{Deserialize, Serialize};

use crate::cell::parse_cell;

/// A rectangular block of cells, zero-based, inclusive on both ends.
///
/// Ordering is not enforced: an inverted input ("B5:A1") parses as-is and
/// the service receives it unchanged. Callers must not assume
/// `start_* <= end_*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRange {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

/// Errors from range-notation parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// Not exactly two colon-separated parts
    InvalidRangeFormat(String),
    /// A part without a column label or a row number
    InvalidCellReference(String),
}

impl std::fmt::Display for RangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeError::InvalidRangeFormat(input) => {
                write!(f, "invalid range format {:?} (expected \"A1:B5\")", input)
            }
            RangeError::InvalidCellReference(input) => {
                write!(f, "invalid cell reference {:?}", input)
            }
        }
    }
}

impl std::error::Error for RangeError {}

/// Parse spreadsheet range notation into zero-based coordinates.
pub fn parse_range(input: &str) -> Result<CellRange, RangeError> {
    let parts: Vec<&str> = input.split(':').collect();
    if parts.len() != 2 {
        return Err(RangeError::InvalidRangeFormat(input.to_string()));
    }

    let start = parse_cell(parts[0])?;
    let end = parse_cell(parts[1])?;

    Ok(CellRange {
        start_row: start.row,
        start_col: start.col,
        end_row: end.row,
        end_col: end.col,
    })
}
