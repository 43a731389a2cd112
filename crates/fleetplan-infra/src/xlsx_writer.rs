//! Single-sheet xlsx export

use std::path::Path;

use fleetplan_types::{CellValue, Error, Result};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatPattern, Workbook, Worksheet};

const HEADER_FILL: u32 = 0x366092;
const MAX_COLUMN_WIDTH: usize = 50;

/// How the header row and column widths are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableStyle {
    /// Bold header only
    #[default]
    Plain,
    /// Filled header with white bold centred text, columns sized to content
    Highlighted,
}

fn excel_err(e: impl std::fmt::Display) -> Error {
    Error::Excel(e.to_string())
}

/// Write `headers` and `rows` to a new workbook at `path`
pub fn write_table(
    path: &Path,
    sheet_name: &str,
    headers: &[String],
    rows: &[Vec<CellValue>],
    style: TableStyle,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name).map_err(excel_err)?;

    let header_format = header_format(style);
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, header.as_str(), &header_format)
            .map_err(excel_err)?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            write_cell(sheet, row_num, col as u16, cell)?;
        }
    }

    if style == TableStyle::Highlighted {
        for (col, width) in column_widths(headers, rows).into_iter().enumerate() {
            sheet
                .set_column_width(col as u16, width as f64)
                .map_err(excel_err)?;
        }
    }

    workbook.save(path).map_err(excel_err)?;
    log::debug!("wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn header_format(style: TableStyle) -> Format {
    match style {
        TableStyle::Plain => Format::new().set_bold(),
        TableStyle::Highlighted => Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(HEADER_FILL))
            .set_pattern(FormatPattern::Solid)
            .set_align(FormatAlign::Center),
    }
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: &CellValue) -> Result<()> {
    match cell {
        CellValue::Empty => {}
        CellValue::Number(n) => {
            sheet.write_number(row, col, *n).map_err(excel_err)?;
        }
        CellValue::Text(s) => {
            sheet.write_string(row, col, s.as_str()).map_err(excel_err)?;
        }
        CellValue::Bool(b) => {
            sheet.write_boolean(row, col, *b).map_err(excel_err)?;
        }
    }
    Ok(())
}

/// Widest rendered value per column plus padding, capped
pub fn column_widths(headers: &[String], rows: &[Vec<CellValue>]) -> Vec<usize> {
    let columns = rows
        .iter()
        .map(|r| r.len())
        .max()
        .unwrap_or(0)
        .max(headers.len());

    (0..columns)
        .map(|col| {
            let header_len = headers.get(col).map(|h| h.chars().count()).unwrap_or(0);
            let longest = rows
                .iter()
                .filter_map(|r| r.get(col))
                .filter(|c| !c.is_blank())
                .map(|c| c.to_string().chars().count())
                .fold(header_len, usize::max);
            (longest + 2).min(MAX_COLUMN_WIDTH)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::read_sheet;
    use tempfile::tempdir;

    #[test]
    fn test_column_widths_capped() {
        let headers = vec!["A".to_string(), "Stops".to_string()];
        let rows = vec![vec![CellValue::Number(12.5), CellValue::text("x".repeat(80))]];
        assert_eq!(column_widths(&headers, &rows), vec![6, 50]);
    }

    #[test]
    fn test_column_widths_ignore_blank_cells() {
        let headers = vec!["Name".to_string()];
        let rows = vec![vec![CellValue::Empty], vec![CellValue::text("ab")]];
        assert_eq!(column_widths(&headers, &rows), vec![6]);
    }

    #[test]
    fn test_write_table_readable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out.xlsx");
        let headers = vec!["Name".to_string(), "Value".to_string()];
        let rows = vec![
            vec![CellValue::text("a"), CellValue::Number(1.5)],
            vec![CellValue::text("b"), CellValue::Empty],
        ];
        write_table(&path, "Data", &headers, &rows, TableStyle::Highlighted).unwrap();

        let sheet = read_sheet(&path, "Data").unwrap();
        assert_eq!(sheet.headers, headers);
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.cell(0, 1), &CellValue::Number(1.5));
        assert!(sheet.cell(1, 1).is_blank());
    }
}
