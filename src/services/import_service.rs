use std::{collections::HashMap, io::Cursor};

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use thiserror::Error;

use crate::models::{COMPANIES, NewProduct, canonical_company};

/// Rows above the first data row. Reported row numbers are shifted by this.
pub const HEADER_ROWS: usize = 1;

pub const ACCEPTED_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

pub type RawRow = HashMap<String, Cell>;

#[derive(Debug, Error, PartialEq)]
pub enum ImportError {
    #[error("Only .xlsx and .xls files are accepted")]
    UnsupportedFile,
    #[error("Could not read file: {0}")]
    Unreadable(String),
    #[error("Could not read file: the workbook has no sheets")]
    NoSheet,
    #[error("The sheet contains no product rows")]
    NoRows,
    #[error("Invalid data in Excel row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
}

pub fn check_extension(file_name: &str) -> Result<(), ImportError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .ok_or(ImportError::UnsupportedFile)?;

    if ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(ImportError::UnsupportedFile)
    }
}

pub fn parse_workbook(bytes: &[u8]) -> Result<Vec<NewProduct>, ImportError> {
    let rows = read_workbook(bytes)?;
    if rows.is_empty() {
        return Err(ImportError::NoRows);
    }
    parse_rows(&rows)
}

/// Reads the first sheet into header-keyed rows, skipping rows with no values.
pub fn read_workbook(bytes: &[u8]) -> Result<Vec<RawRow>, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ImportError::Unreadable(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ImportError::NoSheet)?
        .map_err(|e| ImportError::Unreadable(e.to_string()))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    let header: Vec<String> = header
        .iter()
        .map(|cell| cell_text(&to_cell(cell)))
        .collect();

    let parsed = rows
        .map(|row| {
            header
                .iter()
                .zip(row.iter())
                .filter(|(name, _)| !name.is_empty())
                .map(|(name, cell)| (name.clone(), to_cell(cell)))
                .collect::<RawRow>()
        })
        .filter(|row| row.values().any(|cell| !is_blank(cell)))
        .collect();

    Ok(parsed)
}

pub fn parse_rows(rows: &[RawRow]) -> Result<Vec<NewProduct>, ImportError> {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            convert_row(row).map_err(|reason| ImportError::InvalidRow {
                row: idx + 1 + HEADER_ROWS,
                reason,
            })
        })
        .collect()
}

fn convert_row(row: &RawRow) -> Result<NewProduct, String> {
    Ok(NewProduct {
        name: non_empty(row, "name")?,
        product_no: non_empty(row, "product_no")?,
        description: non_empty(row, "description")?,
        total_in_store: stock(row)?,
        company: company(row)?,
    })
}

fn field<'a>(row: &'a RawRow, name: &str) -> &'a Cell {
    row.get(name).unwrap_or(&Cell::Empty)
}

fn non_empty(row: &RawRow, name: &str) -> Result<String, String> {
    let value = cell_text(field(row, name));
    if value.is_empty() {
        return Err(format!("{} is empty", name));
    }
    Ok(value)
}

fn stock(row: &RawRow) -> Result<i32, String> {
    let value = coerce_number(field(row, "total_in_store"))
        .ok_or_else(|| "total_in_store is not a number".to_string())?;

    if value < 0.0 {
        return Err("total_in_store is negative".to_string());
    }
    if value.fract() != 0.0 {
        return Err("total_in_store must be a whole number".to_string());
    }
    if value > f64::from(i32::MAX) {
        return Err("total_in_store is too large".to_string());
    }
    Ok(value as i32)
}

fn company(row: &RawRow) -> Result<String, String> {
    let raw = cell_text(field(row, "company"));
    canonical_company(&raw)
        .map(str::to_string)
        .ok_or_else(|| format!("company must be one of: {}", COMPANIES.join(", ")))
}

/// Numeric reading of a raw cell. Blank cells read as zero; unparsable text has no value.
pub fn coerce_number(cell: &Cell) -> Option<f64> {
    let value = match cell {
        Cell::Empty => 0.0,
        Cell::Number(n) => *n,
        Cell::Bool(b) => f64::from(u8::from(*b)),
        Cell::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().ok()?
            }
        }
    };
    value.is_finite().then_some(value)
}

pub fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Text(s) => s.trim().to_string(),
        Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        Cell::Number(n) => n.to_string(),
        Cell::Bool(b) => b.to_string(),
    }
}

fn is_blank(cell: &Cell) -> bool {
    match cell {
        Cell::Empty => true,
        Cell::Text(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        other => Cell::Text(other.to_string()),
    }
}
