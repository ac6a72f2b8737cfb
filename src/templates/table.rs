use std::path::Path;

use super::TemplateError;

/// Rows below the CSV header line that hold template metadata and must
/// never be overwritten; data fill starts right after them.
pub const RESERVED_ROWS: usize = 3;

/// A CSV dataset template held in memory: the header line plus a grid of
/// string cells, all rows normalized to the header width.
#[derive(Debug)]
pub struct TemplateTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TemplateTable {
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut records = reader.records();
        let headers: Vec<String> = match records.next() {
            Some(header) => header?.iter().map(str::to_string).collect(),
            None => Vec::new(),
        };

        let width = headers.len();
        let mut rows = Vec::new();
        for record in records {
            let mut row: Vec<String> = record?.iter().map(str::to_string).collect();
            row.resize(width, String::new());
            rows.push(row);
        }

        Ok(TemplateTable { headers, rows })
    }

    #[cfg(test)]
    pub fn from_parts(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        TemplateTable { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn blank_row(&self) -> Vec<String> {
        vec![String::new(); self.headers.len()]
    }

    /// Grow the grid until it can hold `n` data rows after the reserved
    /// metadata rows.
    pub fn ensure_data_capacity(&mut self, n: usize) {
        while self.rows.len() < RESERVED_ROWS + n {
            self.rows.push(self.blank_row());
        }
    }

    /// Overwrite the `i`-th data row (offset past the reserved rows).
    pub fn set_data_row(&mut self, i: usize, row: Vec<String>) {
        self.rows[RESERVED_ROWS + i] = row;
    }

    pub fn row(&self, i: usize) -> &[String] {
        &self.rows[i]
    }

    pub fn data_row(&self, i: usize) -> &[String] {
        &self.rows[RESERVED_ROWS + i]
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn write_to(&self, path: &Path) -> Result<(), TemplateError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}
