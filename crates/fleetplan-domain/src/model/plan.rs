use fleetplan_types::CellValue;
use serde::{Deserialize, Serialize};

use super::analysis::SystemAnalysis;

/// Per-route columns repeated in every plan row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteColumns {
    pub name: String,
    pub stops: String,
    pub demand: f64,
}

/// One (bus capacity, headway) row of an operational plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRow {
    pub hub_name: String,
    pub routes: Vec<RouteColumns>,
    pub desired_demand: f64,
    pub bus_capacity: u32,
    pub headway: u32,
    pub cycle_time: f64,
    #[serde(flatten)]
    pub analysis: SystemAnalysis,
}

impl PlanRow {
    /// Column headers for a plan whose lines have `route_count` routes
    pub fn headers(route_count: usize) -> Vec<String> {
        let mut headers = vec!["HubName".to_string()];
        for i in 1..=route_count {
            headers.push(format!("Route_{}_Name", i));
            headers.push(format!("Route_{}_Stops", i));
        }
        for i in 1..=route_count {
            headers.push(format!("Route_{}_Demand", i));
        }
        headers.extend(
            [
                "Desired_Demand",
                "Bus_Capacity",
                "Headway (min)",
                "Cycle_Time (min)",
                "Buses_per_Group",
                "Total_Trips",
                "Groups_per_Hour",
                "Unique_Groups",
                "Fleet_Size",
                "Hub_Area",
                "Capacity_per_Hour",
                "Empty_Seats_per_Hour",
            ]
            .iter()
            .map(|s| s.to_string()),
        );
        headers
    }

    /// Cell values in `headers` order
    pub fn cells(&self) -> Vec<CellValue> {
        let mut cells = vec![CellValue::text(self.hub_name.as_str())];
        for route in &self.routes {
            cells.push(CellValue::text(route.name.as_str()));
            cells.push(CellValue::text(route.stops.as_str()));
        }
        for route in &self.routes {
            cells.push(CellValue::Number(route.demand));
        }
        let a = &self.analysis;
        cells.extend([
            CellValue::Number(self.desired_demand),
            CellValue::Number(self.bus_capacity as f64),
            CellValue::Number(self.headway as f64),
            CellValue::Number(self.cycle_time),
            CellValue::Number(a.buses_per_group as f64),
            CellValue::Number(a.total_trips as f64),
            CellValue::Number(a.groups_per_hour as f64),
            CellValue::Number(a.unique_groups as f64),
            CellValue::Number(a.fleet_size as f64),
            CellValue::Number(a.hub_area),
            CellValue::Number(round1(a.capacity_per_hour)),
            CellValue::Number(round1(a.empty_seats_per_hour)),
        ]);
        cells
    }
}

/// All plan rows of one line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationalPlan {
    pub line_name: String,
    pub safe_line_name: String,
    pub hub_name: String,
    pub desired_demand: f64,
    pub cycle_time: f64,
    pub rows: Vec<PlanRow>,
}

impl OperationalPlan {
    pub const SHEET_NAME: &'static str = "Operational_Analysis";

    pub fn route_count(&self) -> usize {
        self.rows.first().map(|r| r.routes.len()).unwrap_or(0)
    }

    pub fn headers(&self) -> Vec<String> {
        PlanRow::headers(self.route_count())
    }

    pub fn file_name(&self) -> String {
        format!("Operational_Plan_{}.xlsx", self.safe_line_name)
    }
}

/// Summary shown for a loaded line before plans are generated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePreview {
    pub line_name: String,
    pub routes: String,
    pub hub_name: String,
    pub route1_demand: Option<f64>,
    pub route2_demand: Option<f64>,
    pub max_demand: f64,
    pub cycle_time: f64,
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_follow_route_count() {
        let headers = PlanRow::headers(2);
        assert_eq!(
            &headers[..7],
            &[
                "HubName",
                "Route_1_Name",
                "Route_1_Stops",
                "Route_2_Name",
                "Route_2_Stops",
                "Route_1_Demand",
                "Route_2_Demand"
            ]
        );
        assert_eq!(headers.len(), 7 + 12);
        assert_eq!(headers.last().map(String::as_str), Some("Empty_Seats_per_Hour"));
    }

    #[test]
    fn test_cells_match_headers() {
        let row = PlanRow {
            hub_name: "Gate3".to_string(),
            routes: vec![RouteColumns {
                name: "R1".to_string(),
                stops: "1 → 2".to_string(),
                demand: 300.0,
            }],
            desired_demand: 300.0,
            bus_capacity: 50,
            headway: 10,
            cycle_time: 12.5,
            analysis: SystemAnalysis::ZERO,
        };
        assert_eq!(row.cells().len(), PlanRow::headers(1).len());
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(37.06), 37.1);
        assert_eq!(round1(-0.04), -0.0);
    }
}
