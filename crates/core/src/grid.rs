//! In-process mirror of the grid widget.
//!
//! Holds whatever the service last sent: rows of loosely typed JSON cells.
//! Full replacement (`replace_all`) discards prior contents entirely;
//! single-cell edits grow the grid as needed and report the previous value
//! so the edit can be broadcast.

use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridData {
    rows: Vec<Vec<Value>>,
}

impl GridData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire data set. Prior contents are discarded.
    pub fn replace_all(&mut self, rows: Vec<Vec<Value>>) {
        self.rows = rows;
    }

    /// Set one cell, growing the grid with nulls as needed.
    ///
    /// Returns the previous value, or None when the cell did not exist.
    pub fn set_cell(&mut self, row: usize, col: usize, value: Value) -> Option<Value> {
        if self.rows.len() <= row {
            self.rows.resize(row + 1, Vec::new());
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, Value::Null);
            cells[col] = value;
            return None;
        }
        Some(std::mem::replace(&mut cells[col], value))
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row)?.get(col)
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
