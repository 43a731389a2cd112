use fleetplan_types::CellValue;
use serde::{Deserialize, Serialize};

/// Hub area of one plan row, keyed by bus capacity and headway
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HubAreaRecord {
    pub bus_capacity: f64,
    pub headway: f64,
    pub hub_area: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubSummaryRow {
    pub bus_capacity: f64,
    pub headway: f64,
    /// One entry per source file, in `HubSummary::area_columns` order
    pub areas: Vec<f64>,
    pub sum_hub_area: f64,
}

/// Hub areas of every plan file sharing one hub, outer-joined on the key columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubSummary {
    pub hub_name: String,
    pub area_columns: Vec<String>,
    pub rows: Vec<HubSummaryRow>,
}

impl HubSummary {
    pub fn headers(&self) -> Vec<String> {
        let mut headers = vec!["Bus_Capacity".to_string(), "Headway (min)".to_string()];
        headers.extend(self.area_columns.iter().cloned());
        headers.push("Sum_Hub_Area".to_string());
        headers
    }

    pub fn cell_rows(&self) -> Vec<Vec<CellValue>> {
        self.rows
            .iter()
            .map(|row| {
                let mut cells = vec![
                    CellValue::Number(row.bus_capacity),
                    CellValue::Number(row.headway),
                ];
                cells.extend(row.areas.iter().map(|a| CellValue::Number(*a)));
                cells.push(CellValue::Number(row.sum_hub_area));
                cells
            })
            .collect()
    }

    pub fn file_name(&self) -> String {
        format!("Summary_{}.xlsx", self.hub_name.replace([' ', '/'], "_"))
    }

    pub fn total_hub_area(&self) -> f64 {
        self.rows.iter().map(|r| r.sum_hub_area).sum()
    }
}
