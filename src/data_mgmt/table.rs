use std::path::Path;

use calamine::{open_workbook, Data, DataType, Reader, Xlsx};
use thiserror::Error;

use super::models::{CellValue, Row};

#[derive(Error, Debug)]
pub enum TableError {
    #[error("could not open workbook: {0}")]
    Xlsx(#[from] calamine::XlsxError),
    #[error("workbook has no worksheet")]
    NoWorksheet,
    #[error("could not read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("unsupported table format: {0}")]
    UnsupportedFormat(String),
}

/// A source table loaded whole into memory: ordered column names from the
/// first row, one `Row` per subsequent line.
#[derive(Debug)]
pub struct SourceTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl SourceTable {
    /// Load from an XLSX or CSV file, dispatched on the extension.
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("xlsx") => Self::from_xlsx(path),
            Some("csv") => Self::from_csv(path),
            other => Err(TableError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    /// First worksheet of an XLSX workbook; first row is the header.
    pub fn from_xlsx(path: &Path) -> Result<Self, TableError> {
        let mut workbook: Xlsx<_> = open_workbook(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(TableError::NoWorksheet)??;

        let mut sheet_rows = range.rows();
        let columns: Vec<String> = match sheet_rows.next() {
            Some(header) => header.iter().map(cell_to_header).collect(),
            None => Vec::new(),
        };

        let rows = sheet_rows
            .enumerate()
            .map(|(index, cells)| {
                let mut row = Row::new(index);
                for (column, cell) in columns.iter().zip(cells) {
                    row.set_cell(column.clone(), cell_to_value(cell));
                }
                row
            })
            .collect();

        Ok(SourceTable { columns, rows })
    }

    pub fn from_csv(path: &Path) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let mut row = Row::new(index);
            for (column, field) in columns.iter().zip(record.iter()) {
                let value = if field.trim().is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(field.to_string())
                };
                row.set_cell(column.clone(), value);
            }
            rows.push(row);
        }

        Ok(SourceTable { columns, rows })
    }

    /// In-memory construction, used by tests.
    #[cfg(test)]
    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> Self {
        SourceTable { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn cell_to_header(cell: &Data) -> String {
    cell.as_string().unwrap_or_else(|| cell.to_string())
}

fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(s.clone())
            }
        }
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(dt) => CellValue::DateTime(dt),
            None => CellValue::Empty,
        },
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => {
            log::warn!("error cell in worksheet: {e:?}");
            CellValue::Empty
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    #[test]
    fn scalar_cells_convert() {
        assert_eq!(cell_to_value(&Data::Empty), CellValue::Empty);
        assert_eq!(cell_to_value(&Data::Int(7)), CellValue::Int(7));
        assert_eq!(cell_to_value(&Data::Float(2.5)), CellValue::Float(2.5));
        assert_eq!(cell_to_value(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(
            cell_to_value(&Data::String("PX_10_RG_5".into())),
            CellValue::Text("PX_10_RG_5".into())
        );
    }

    #[test]
    fn blank_string_cell_is_empty() {
        assert_eq!(cell_to_value(&Data::String("  ".into())), CellValue::Empty);
    }

    #[test]
    fn iso_datetime_cell_converts() {
        let value = cell_to_value(&Data::DateTimeIso("2023-04-26T00:00:00".into()));
        match value {
            CellValue::DateTime(dt) => {
                assert_eq!(dt.format("%Y-%m-%d").to_string(), "2023-04-26")
            }
            other => panic!("expected a datetime cell, got {other:?}"),
        }
    }

    #[test]
    fn csv_table_reads_headers_and_rows() {
        let mut file = tempfile::NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "Nom,long,lat,plantation").unwrap();
        writeln!(file, "PX_10_RG_5,3.87,43.61,2015").unwrap();
        writeln!(file, "PX_10_RG_6,3.88,,").unwrap();

        let table = SourceTable::from_path(file.path()).unwrap();
        assert_eq!(table.columns(), ["Nom", "long", "lat", "plantation"]);
        assert_eq!(table.len(), 2);
        assert!(table.has_column("plantation"));

        let first = &table.rows()[0];
        assert_eq!(first.require_f64("lat").unwrap(), 43.61);
        let second = &table.rows()[1];
        assert!(second.optional("lat").is_none());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = SourceTable::from_path(Path::new("trees.ods")).unwrap_err();
        assert!(matches!(err, TableError::UnsupportedFormat(_)));
    }
}
