use fleetplan_types::CellValue;
use serde::{Deserialize, Serialize};

/// One row of the "lineroute items" sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRouteItem {
    pub line_name: String,
    pub line_route_name: String,
    pub stop_point_no: CellValue,
    pub stop_name: Option<String>,
}

impl LineRouteItem {
    pub fn new(
        line_name: impl Into<String>,
        line_route_name: impl Into<String>,
        stop_point_no: CellValue,
        stop_name: Option<&str>,
    ) -> Self {
        Self {
            line_name: line_name.into(),
            line_route_name: line_route_name.into(),
            stop_point_no,
            stop_name: stop_name.map(String::from),
        }
    }
}

/// One row of the "lineroutes" sheet, keyed by route name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRouteAttributes {
    pub name: String,
    pub link_runtime: CellValue,
    pub max_volume_ap: CellValue,
}

/// One line route of the merged stop-sequence table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopSequenceRow {
    pub line_name: String,
    pub line_route_name: String,
    pub stops_array: String,
    pub hub_name: String,
    pub link_runtime: CellValue,
    pub max_volume_ap: CellValue,
}
