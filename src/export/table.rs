//! Tabular data handed to the workbook writer

use std::io::Read;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    /// Numbers become [`Cell::Number`], blanks and NaN/inf [`Cell::Empty`],
    /// the rest text
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(number) if number.is_finite() => Cell::Number(number),
            Ok(_) => Cell::Empty,
            Err(_) => Cell::Text(raw.to_string()),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// A labelled grid: one index column plus named data columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub index_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub label: String,
    pub cells: Vec<Cell>,
}

impl Table {
    pub fn new(index_name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            index_name: index_name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, label: impl Into<String>, cells: Vec<Cell>) {
        self.rows.push(Row {
            label: label.into(),
            cells,
        });
    }

    /// Read a CSV whose first column is the row index
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);

        let headers = reader.headers()?.clone();
        let mut header_iter = headers.iter();
        let index_name = header_iter.next().unwrap_or_default().to_string();
        let columns = header_iter.map(str::to_string).collect();

        let mut table = Table::new(index_name, columns);
        for record in reader.records() {
            let record = record?;
            let mut fields = record.iter();
            let label = fields.next().unwrap_or_default();
            let cells = fields.map(Cell::parse).collect();
            table.push_row(label, cells);
        }

        Ok(table)
    }

    /// Number of data rows
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Widest row, counting the header
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.cells.len())
            .chain(std::iter::once(self.columns.len()))
            .max()
            .unwrap_or(0)
    }
}
