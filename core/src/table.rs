//! Tabular query results.
//!
//! A `ResultTable` lives for exactly one rendering pass. Cells keep the
//! storage type the database reported; readers coerce on access so a
//! null or non-numeric measure reads as zero instead of failing a chart.

use rusqlite::types::ValueRef;
use serde::{Deserialize, Serialize};

/// A single value as returned by the data store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Cell {
    /// Numeric view of the cell. Null, NaN and unparseable text read as 0.
    pub fn as_f64(&self) -> f64 {
        let value = match self {
            Cell::Null => 0.0,
            Cell::Integer(i) => *i as f64,
            Cell::Real(r) => *r,
            Cell::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        };
        if value.is_finite() { value } else { 0.0 }
    }

    /// Integer view of the cell, if it holds something integral.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Integer(i) => Some(*i),
            Cell::Real(r) if r.is_finite() && r.fract() == 0.0 => Some(*r as i64),
            Cell::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Display string for a grouping key. Numbers stored as floats with no
    /// fractional part print without the trailing ".0" while they fit in
    /// an i64; larger magnitudes keep the float rendering.
    pub fn to_label(&self) -> String {
        match self {
            Cell::Null => "Unknown".to_string(),
            Cell::Integer(i) => i.to_string(),
            Cell::Real(r) if r.fract() == 0.0 && r.abs() < i64::MAX as f64 => format!("{}", *r as i64),
            Cell::Real(r) => r.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }
}

impl From<ValueRef<'_>> for Cell {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Cell::Null,
            ValueRef::Integer(i) => Cell::Integer(i),
            ValueRef::Real(r) => Cell::Real(r),
            ValueRef::Text(t) => Cell::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Cell::Text(String::from_utf8_lossy(b).into_owned()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Real(value)
    }
}

/// Rows of named columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ResultTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    /// Build a table from string column names; handy for mock sources.
    pub fn from_rows(columns: &[&str], rows: Vec<Vec<Cell>>) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column lookup is case-insensitive.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(column))
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Numeric value at (row, column); missing cells read as 0.
    pub fn number(&self, row: usize, column: &str) -> f64 {
        self.cell(row, column).map(Cell::as_f64).unwrap_or(0.0)
    }

    pub fn label(&self, row: usize, column: &str) -> String {
        self.cell(row, column)
            .map(Cell::to_label)
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn labels(&self, column: &str) -> Vec<String> {
        (0..self.len()).map(|r| self.label(r, column)).collect()
    }

    pub fn numbers(&self, column: &str) -> Vec<f64> {
        (0..self.len()).map(|r| self.number(r, column)).collect()
    }

    /// (label, value) pairs in row order.
    pub fn pairs(&self, label_column: &str, value_column: &str) -> Vec<(String, f64)> {
        (0..self.len())
            .map(|r| (self.label(r, label_column), self.number(r, value_column)))
            .collect()
    }

    /// Rewrite every cell of `column` in place. No-op if the column is absent.
    pub fn map_column(&mut self, column: &str, f: impl Fn(&Cell) -> Cell) {
        if let Some(idx) = self.column_index(column) {
            for row in &mut self.rows {
                if let Some(cell) = row.get_mut(idx) {
                    *cell = f(cell);
                }
            }
        }
    }

    /// Rows whose `column` label equals `value`, same columns.
    pub fn rows_matching(&self, column: &str, value: &str) -> ResultTable {
        let Some(idx) = self.column_index(column) else {
            return ResultTable::new(self.columns.clone());
        };
        ResultTable {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| row.get(idx).map(Cell::to_label).as_deref() == Some(value))
                .cloned()
                .collect(),
        }
    }
}
