//! Loader for the merged stop-sequence table used by plan generation

use std::collections::HashMap;
use std::path::Path;

use fleetplan_domain::model::{Line, Route};
use fleetplan_types::Result;

use crate::schema::{columns, require_columns};
use crate::workbook::{read_first_sheet, Sheet};

pub const STOP_TABLE_COLUMNS: &[&str] = &[
    columns::LINE_NAME,
    columns::LINE_ROUTE_NAME,
    columns::STOPS_ARRAY,
    columns::HUB_NAME,
    columns::LINK_RUNTIME,
    columns::MAX_VOLUME_AP,
];

/// Read lines from the first sheet of a stop-sequence workbook
pub fn load_lines(path: &Path) -> Result<Vec<Line>> {
    let sheet = read_first_sheet(path)?;
    let lines = parse_lines(&sheet)?;
    log::info!("loaded {} lines from {}", lines.len(), path.display());
    Ok(lines)
}

/// Group rows into lines, keeping first-appearance order of lines and row
/// order of routes
pub fn parse_lines(sheet: &Sheet) -> Result<Vec<Line>> {
    let idx = require_columns(sheet, STOP_TABLE_COLUMNS)?;
    let (line_col, route_col, stops_col, hub_col, runtime_col, volume_col) =
        (idx[0], idx[1], idx[2], idx[3], idx[4], idx[5]);

    let mut lines: Vec<Line> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for row in 0..sheet.row_count() {
        let Some(line_name) = sheet.cell(row, line_col).as_text() else {
            log::warn!("row {}: no line name, skipped", row + 2);
            continue;
        };

        let route_name = sheet.cell(row, route_col).as_text().unwrap_or_default();
        let volume_cell = sheet.cell(row, volume_col);
        let max_volume_ap = match volume_cell.as_f64() {
            Some(v) => v,
            None => {
                log::warn!(
                    "line {} route {}: volume '{}' is not a number, using 0",
                    line_name,
                    route_name,
                    volume_cell
                );
                0.0
            }
        };

        let stops_text = sheet.cell(row, stops_col).as_text();
        let mut route = Route::new(
            route_name,
            stops_text.as_deref(),
            sheet.cell(row, runtime_col).clone(),
            max_volume_ap,
        );
        if let Some(hub) = sheet.cell(row, hub_col).as_text() {
            route = route.with_hub_name(hub);
        }

        let index = *positions.entry(line_name.clone()).or_insert_with(|| {
            lines.push(Line::new(line_name.clone(), Vec::new()));
            lines.len() - 1
        });
        lines[index].routes.push(route);
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetplan_types::{CellValue, Error, SchemaError};

    fn stop_table(rows: Vec<Vec<CellValue>>) -> Sheet {
        Sheet {
            name: "Sheet1".to_string(),
            headers: STOP_TABLE_COLUMNS.iter().map(|s| s.to_string()).collect(),
            rows,
        }
    }

    fn row(line: &str, route: &str, stops: &str, hub: &str, runtime: CellValue, volume: CellValue) -> Vec<CellValue> {
        vec![
            CellValue::text(line),
            CellValue::text(route),
            CellValue::text(stops),
            CellValue::text(hub),
            runtime,
            volume,
        ]
    }

    #[test]
    fn test_parse_lines_groups_in_first_appearance_order() {
        let sheet = stop_table(vec![
            row("B", "B-1", "1 → 2", "Gate3", CellValue::text("60s"), CellValue::Number(10.0)),
            row("A", "A-1", "3 → 4 → 5", "Ext. Hub01", CellValue::Number(120.0), CellValue::Number(30.0)),
            row("B", "B-2", "2 → 1", "Gate3", CellValue::text("60s"), CellValue::Number(12.0)),
        ]);
        let lines = parse_lines(&sheet).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].name, "B");
        assert_eq!(lines[0].routes.len(), 2);
        assert_eq!(lines[0].routes[1].route_name, "B-2");
        assert_eq!(lines[1].hub_name(), "Ext. Hub01");
        assert_eq!(lines[1].routes[0].stop_sequence, vec!["3", "4", "5"]);
    }

    #[test]
    fn test_parse_lines_non_numeric_volume_is_zero() {
        let sheet = stop_table(vec![row("A", "A-1", "", "", CellValue::Empty, CellValue::text("n/a"))]);
        let lines = parse_lines(&sheet).unwrap();
        assert_eq!(lines[0].routes[0].max_volume_ap, 0.0);
        assert!(lines[0].routes[0].stop_sequence.is_empty());
        assert_eq!(lines[0].hub_name(), "N/A");
    }

    #[test]
    fn test_parse_lines_missing_columns() {
        let sheet = Sheet {
            name: "Sheet1".to_string(),
            headers: vec![columns::LINE_NAME.to_string(), columns::HUB_NAME.to_string()],
            rows: vec![],
        };
        match parse_lines(&sheet) {
            Err(Error::Schema(SchemaError::MissingColumns { columns: missing, .. })) => {
                assert_eq!(missing.len(), 4);
                assert!(missing.contains(&columns::STOPS_ARRAY.to_string()));
            }
            other => panic!("unexpected: {:?}", other.map(|l| l.len())),
        }
    }
}
