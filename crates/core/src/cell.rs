//! Cell reference parsing and display.
//!
//! Addresses like "B5" decode to zero-based row/column pairs. Column labels
//! decode with the positional scheme the deployed web client has always
//! sent: each letter contributes `value * 26 + (letter - 'A')`, so `A` is a
//! zero digit and leading `A`s contribute nothing ("AA" decodes to 0 like
//! "A", "AB" to 1 like "B"). Conventional spreadsheet numbering has no zero
//! digit and disagrees on every multi-letter label; the mismatch is kept
//! for compatibility with the service and is confined to parsing. Display
//! goes the other way with conventional letters.

use crate::range::RangeError;

/// Zero-based cell coordinates. Derived from string input, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for CellRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", col_label(self.col), self.row + 1)
    }
}

/// Parse a single cell reference ("B5") into zero-based coordinates.
///
/// The column label is the first run of uppercase ASCII letters, the row the
/// first run of digits; both must be present. Rows are 1-based on the wire
/// and zero-based here, so row 0 ("A0") is rejected rather than wrapped.
pub fn parse_cell(input: &str) -> Result<CellRef, RangeError> {
    let label = first_run(input, |c| c.is_ascii_uppercase());
    let digits = first_run(input, |c| c.is_ascii_digit());

    let (label, digits) = match (label, digits) {
        (Some(label), Some(digits)) => (label, digits),
        _ => return Err(RangeError::InvalidCellReference(input.to_string())),
    };

    let row = digits
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| RangeError::InvalidCellReference(input.to_string()))?;
    let col = decode_col_label(label)
        .ok_or_else(|| RangeError::InvalidCellReference(input.to_string()))?;

    Ok(CellRef { row, col })
}

/// First maximal run of characters matching `pred`, or None if there is none.
fn first_run(s: &str, pred: fn(char) -> bool) -> Option<&str> {
    let start = s.find(pred)?;
    let rest = &s[start..];
    let len = rest.find(|c| !pred(c)).unwrap_or(rest.len());
    Some(&rest[..len])
}

/// Legacy positional decode: A=0, each letter shifts by 26 with no digit
/// offset. None on arithmetic overflow (absurdly long labels).
fn decode_col_label(label: &str) -> Option<usize> {
    label.bytes().try_fold(0usize, |acc, b| {
        acc.checked_mul(26)?.checked_add((b - b'A') as usize)
    })
}

/// Convert a 0-based column index to conventional spreadsheet letters:
/// 0=A, 25=Z, 26=AA. Used for display only; see the module docs for why
/// this is not the inverse of parsing.
pub fn col_label(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}
