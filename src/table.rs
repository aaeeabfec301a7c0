//! Tabular staging between extracted records and spreadsheet cells.

use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, XlsxError};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// One extracted entity: field name to scalar value, in extraction order.
pub type Record = serde_json::Map<String, Value>;

/// Excel sheet limits. The header occupies one row.
pub const MAX_ROWS: usize = 1_048_576;
pub const MAX_COLUMNS: usize = 16_384;
pub const MAX_TEXT_LENGTH: usize = 32_767;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("value for column '{column}' in record {row} is {kind}, expected a scalar")]
    NonScalarValue {
        row: usize,
        column: String,
        kind: &'static str,
    },

    #[error("column name of {length} characters exceeds the cell limit of {MAX_TEXT_LENGTH}")]
    ColumnNameTooLong { length: usize },

    #[error("text for column '{column}' in record {row} is {length} characters (max {MAX_TEXT_LENGTH})")]
    TextTooLong {
        row: usize,
        column: String,
        length: usize,
    },

    #[error("{count} columns exceed the sheet limit of {MAX_COLUMNS}")]
    TooManyColumns { count: usize },

    #[error("{count} records exceed the sheet limit of {}", MAX_ROWS - 1)]
    TooManyRows { count: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    fn from_value(value: &Value, row: usize, column: &str) -> Result<Self, TableError> {
        match value {
            Value::Null => Ok(Cell::Empty),
            Value::Bool(b) => Ok(Cell::Bool(*b)),
            // Always Some without serde_json's arbitrary_precision.
            Value::Number(n) => Ok(n.as_f64().map_or(Cell::Empty, Cell::Number)),
            Value::String(s) => {
                let length = s.chars().count();
                if length > MAX_TEXT_LENGTH {
                    return Err(TableError::TextTooLong {
                        row,
                        column: column.to_string(),
                        length,
                    });
                }
                Ok(Cell::Text(s.clone()))
            }
            Value::Array(_) => Err(TableError::NonScalarValue {
                row,
                column: column.to_string(),
                kind: "an array",
            }),
            Value::Object(_) => Err(TableError::NonScalarValue {
                row,
                column: column.to_string(),
                kind: "an object",
            }),
        }
    }
}

/// Rows of cells under a shared header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a table with one row per record and one column per distinct
    /// key, ordered by first appearance. Missing keys and nulls stay empty.
    pub fn from_records(records: &[Record]) -> Result<Self, TableError> {
        if records.len() >= MAX_ROWS {
            return Err(TableError::TooManyRows {
                count: records.len(),
            });
        }

        let mut columns: Vec<String> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();
        for record in records {
            for key in record.keys() {
                if !positions.contains_key(key.as_str()) {
                    let length = key.chars().count();
                    if length > MAX_TEXT_LENGTH {
                        return Err(TableError::ColumnNameTooLong { length });
                    }
                    positions.insert(key.as_str(), columns.len());
                    columns.push(key.clone());
                }
            }
        }

        if columns.len() > MAX_COLUMNS {
            return Err(TableError::TooManyColumns {
                count: columns.len(),
            });
        }

        let mut rows = Vec::with_capacity(records.len());
        for (row, record) in records.iter().enumerate() {
            let mut cells = vec![Cell::Empty; columns.len()];
            for (key, value) in record {
                cells[positions[key.as_str()]] = Cell::from_value(value, row, key)?;
            }
            rows.push(cells);
        }

        Ok(Self { columns, rows })
    }

    /// True when the table has no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Writes a single worksheet: bold header on the first row, data below,
    /// no index column.
    pub fn write_xlsx(&self, path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();

        for (col, name) in self.columns.iter().enumerate() {
            worksheet.write_string_with_format(0, column_number(col)?, name, &header)?;
        }

        for (index, cells) in self.rows.iter().enumerate() {
            let row = row_number(index + 1)?;
            for (col, cell) in cells.iter().enumerate() {
                let col = column_number(col)?;
                match cell {
                    Cell::Empty => {}
                    Cell::Text(text) => {
                        worksheet.write_string(row, col, text)?;
                    }
                    Cell::Number(number) => {
                        worksheet.write_number(row, col, *number)?;
                    }
                    Cell::Bool(flag) => {
                        worksheet.write_boolean(row, col, *flag)?;
                    }
                }
            }
        }

        workbook.save(path)
    }
}

fn row_number(index: usize) -> Result<RowNum, XlsxError> {
    RowNum::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}

fn column_number(index: usize) -> Result<ColNum, XlsxError> {
    ColNum::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}
