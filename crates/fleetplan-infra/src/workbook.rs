//! Worksheet reading for Excel workbooks and CSV files

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use fleetplan_types::{CellValue, Error, Result};

/// Extensions read through calamine
const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

static EMPTY_CELL: CellValue = CellValue::Empty;

/// A worksheet: header row plus data rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at (row, col); short rows read as empty
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

fn is_csv(path: &Path) -> bool {
    extension(path).as_deref() == Some("csv")
}

/// Check if a path has a readable table extension
pub fn is_supported_table(path: &Path) -> bool {
    extension(path)
        .map(|ext| ext == "csv" || EXCEL_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn workbook_error(path: &Path, e: impl std::fmt::Display) -> Error {
    Error::Workbook(format!("{}: {}", path.display(), e))
}

fn ensure_readable(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }
    if !is_supported_table(path) {
        return Err(Error::InvalidInput(format!(
            "{} is not a workbook or CSV file",
            path.display()
        )));
    }
    Ok(())
}

/// Sheet names in workbook order. A CSV file has one sheet named after its stem.
pub fn sheet_names(path: &Path) -> Result<Vec<String>> {
    ensure_readable(path)?;
    if is_csv(path) {
        return Ok(vec![csv_sheet_name(path)]);
    }
    let workbook = open_workbook_auto(path).map_err(|e| workbook_error(path, e))?;
    Ok(workbook.sheet_names())
}

pub fn read_sheet(path: &Path, name: &str) -> Result<Sheet> {
    ensure_readable(path)?;
    if is_csv(path) {
        return read_csv(path);
    }
    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(path, e))?;
    let range = workbook
        .worksheet_range(name)
        .map_err(|e| workbook_error(path, e))?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|header| header.iter().map(|c| convert_cell(c).to_string().trim().to_string()).collect())
        .unwrap_or_default();
    let rows = rows
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    let sheet = Sheet {
        name: name.to_string(),
        headers,
        rows,
    };
    log::debug!(
        "read sheet '{}' from {}: {} rows",
        sheet.name,
        path.display(),
        sheet.row_count()
    );
    Ok(sheet)
}

pub fn read_first_sheet(path: &Path) -> Result<Sheet> {
    let names = sheet_names(path)?;
    let first = names
        .first()
        .ok_or_else(|| workbook_error(path, "workbook has no sheets"))?;
    read_sheet(path, first)
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::text(s.as_str()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s.as_str()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}

fn csv_sheet_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet1")
        .to_string()
}

/// Numeric-looking fields become numbers, as spreadsheet readers infer them
fn parse_csv_field(field: &str) -> CellValue {
    match field.trim().parse::<f64>() {
        Ok(n) if !field.trim().is_empty() => CellValue::Number(n),
        _ => CellValue::text(field),
    }
}

fn read_csv(path: &Path) -> Result<Sheet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| workbook_error(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| workbook_error(path, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| workbook_error(path, e))?;
        rows.push(record.iter().map(parse_csv_field).collect());
    }

    Ok(Sheet {
        name: csv_sheet_name(path),
        headers,
        rows,
    })
}
