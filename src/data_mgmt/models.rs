use std::collections::HashMap;

use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RowError {
    #[error("column '{0}' not present in table")]
    MissingColumn(String),
    #[error("column '{column}': {detail}")]
    InvalidValue { column: String, detail: String },
}

/// One cell of a source table.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            CellValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Calendar year held by the cell; XLSX numeric cells come through as
    /// floats, so `2015.0` is accepted.
    pub fn as_year(&self) -> Option<i32> {
        match self {
            CellValue::Int(i) => i32::try_from(*i).ok(),
            CellValue::Float(f) if f.fract() == 0.0 => Some(*f as i32),
            CellValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Cell rendered as it should appear in a CSV output cell.
    pub fn to_cell_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// One record of a source table. Exists only during iteration.
#[derive(Clone, Debug)]
pub struct Row {
    index: usize,
    cells: HashMap<String, CellValue>,
}

impl Row {
    pub fn new(index: usize) -> Self {
        Row {
            index,
            cells: HashMap::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_cell(&mut self, column: String, value: CellValue) {
        self.cells.insert(column, value);
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    /// Cell which may be absent or empty without that being an error.
    pub fn optional(&self, column: &str) -> Option<&CellValue> {
        self.get(column).filter(|v| !v.is_empty())
    }

    pub fn require_text(&self, column: &str) -> Result<String, RowError> {
        match self.optional(column) {
            Some(v) => Ok(v.to_cell_string()),
            None => Err(RowError::MissingColumn(column.to_string())),
        }
    }

    pub fn require_f64(&self, column: &str) -> Result<f64, RowError> {
        let value = self
            .optional(column)
            .ok_or_else(|| RowError::MissingColumn(column.to_string()))?;
        value.as_f64().ok_or_else(|| RowError::InvalidValue {
            column: column.to_string(),
            detail: format!("cannot coerce {value:?} to float"),
        })
    }
}
