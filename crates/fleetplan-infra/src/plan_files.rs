//! Reading hub areas back out of generated operational plan files

use fleetplan_domain::model::HubAreaRecord;
use fleetplan_types::Result;

use crate::schema::{columns, require_columns};
use crate::workbook::Sheet;

/// Distinct non-blank hub names in sheet order; `None` without a HubName column
pub fn hub_names(sheet: &Sheet) -> Option<Vec<String>> {
    let col = sheet.column_index(columns::HUB_NAME)?;
    let mut names: Vec<String> = Vec::new();
    for row in 0..sheet.row_count() {
        if let Some(name) = sheet.cell(row, col).as_text() {
            let name = name.trim().to_string();
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    Some(names)
}

/// Hub-area rows belonging to `hub_name`.
///
/// Rows with a non-numeric capacity or headway are skipped; a non-numeric
/// area counts as zero.
pub fn hub_area_records(sheet: &Sheet, hub_name: &str) -> Result<Vec<HubAreaRecord>> {
    let idx = require_columns(
        sheet,
        &[columns::HUB_NAME, columns::BUS_CAPACITY, columns::HEADWAY, columns::HUB_AREA],
    )?;

    let mut records = Vec::new();
    for row in 0..sheet.row_count() {
        let matches = sheet
            .cell(row, idx[0])
            .as_text()
            .map(|name| name.trim() == hub_name)
            .unwrap_or(false);
        if !matches {
            continue;
        }
        let (Some(bus_capacity), Some(headway)) =
            (sheet.cell(row, idx[1]).as_f64(), sheet.cell(row, idx[2]).as_f64())
        else {
            log::debug!("{}: row {} has no numeric key, skipped", sheet.name, row + 2);
            continue;
        };
        records.push(HubAreaRecord {
            bus_capacity,
            headway,
            hub_area: sheet.cell(row, idx[3]).as_f64().unwrap_or(0.0),
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetplan_types::CellValue;

    fn plan_sheet() -> Sheet {
        Sheet {
            name: "Operational_Analysis".to_string(),
            headers: ["HubName", "Bus_Capacity", "Headway (min)", "Fleet_Size", "Hub_Area"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows: vec![
                vec![CellValue::text("Gate3 "), CellValue::Number(25.0), CellValue::Number(10.0), CellValue::Number(12.0), CellValue::Number(840.0)],
                vec![CellValue::text("Gate3"), CellValue::Number(50.0), CellValue::Number(10.0), CellValue::Number(6.0), CellValue::Number(420.0)],
                vec![CellValue::text("Ext. Hub01"), CellValue::Number(25.0), CellValue::Number(10.0), CellValue::Number(2.0), CellValue::Number(140.0)],
                vec![CellValue::Empty, CellValue::Number(25.0), CellValue::Number(15.0), CellValue::Number(2.0), CellValue::Number(140.0)],
            ],
        }
    }

    #[test]
    fn test_hub_names_trimmed_and_distinct() {
        assert_eq!(hub_names(&plan_sheet()).unwrap(), vec!["Gate3", "Ext. Hub01"]);
    }

    #[test]
    fn test_hub_names_without_column() {
        let sheet = Sheet::default();
        assert!(hub_names(&sheet).is_none());
    }

    #[test]
    fn test_hub_area_records_filter_by_hub() {
        let records = hub_area_records(&plan_sheet(), "Gate3").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].hub_area, 840.0);
        assert_eq!(records[1].bus_capacity, 50.0);
    }

    #[test]
    fn test_hub_area_records_requires_hub_area() {
        let mut sheet = plan_sheet();
        sheet.headers[4] = "Fleet".to_string();
        assert!(hub_area_records(&sheet, "Gate3").is_err());
    }
}
