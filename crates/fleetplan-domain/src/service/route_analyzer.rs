//! Per-line aggregates: cycle time and route demands

use fleetplan_types::CellValue;
use serde::{Deserialize, Serialize};

use super::fleet_sizing::{size_fleet_with_area, DEFAULT_AREA_PER_BUS};
use crate::model::route::split_stops;
use crate::model::{Route, SystemAnalysis};

/// Minutes spent at each stop
pub const DEFAULT_DWELL_TIME: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDemand {
    /// 1-based position of the route within its line
    pub index: usize,
    pub name: String,
    pub demand: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteDemands {
    pub routes: Vec<RouteDemand>,
    /// Largest route demand, the capacity-planning target for the line
    pub desired_demand: f64,
}

impl RouteDemands {
    /// Demand of the route at 1-based `index`
    pub fn demand(&self, index: usize) -> Option<f64> {
        self.routes
            .iter()
            .find(|r| r.index == index)
            .map(|r| r.demand)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteAnalyzer {
    dwell_time: f64,
    area_per_bus: f64,
}

impl Default for RouteAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_DWELL_TIME)
    }
}

impl RouteAnalyzer {
    pub fn new(dwell_time: f64) -> Self {
        Self {
            dwell_time,
            area_per_bus: DEFAULT_AREA_PER_BUS,
        }
    }

    pub fn with_area_per_bus(mut self, area_per_bus: f64) -> Self {
        self.area_per_bus = area_per_bus;
        self
    }

    pub fn dwell_time(&self) -> f64 {
        self.dwell_time
    }

    pub fn extract_stops(route_string: Option<&str>) -> Vec<String> {
        split_stops(route_string)
    }

    /// LINKRUNTIME seconds to minutes. Unparseable values count as zero.
    pub fn convert_runtime_to_minutes(value: &CellValue) -> f64 {
        let seconds = match value {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s
                .trim()
                .trim_end_matches(['s', 'S'])
                .trim()
                .parse::<f64>()
                .ok(),
            CellValue::Empty | CellValue::Bool(_) => None,
        };
        match seconds {
            Some(s) if s.is_finite() => s / 60.0,
            _ => 0.0,
        }
    }

    /// Total runtime of all routes plus dwell time at every stop, in minutes
    pub fn calculate_cycle_time(&self, routes: &[Route]) -> f64 {
        let total_runtime: f64 = routes
            .iter()
            .map(|r| Self::convert_runtime_to_minutes(&r.link_runtime))
            .sum();
        let total_stops: usize = routes.iter().map(Route::stop_count).sum();
        total_runtime + total_stops as f64 * self.dwell_time
    }

    pub fn get_route_demands(&self, routes: &[Route]) -> RouteDemands {
        let mut demands = RouteDemands::default();
        for (i, route) in routes.iter().enumerate() {
            demands.routes.push(RouteDemand {
                index: i + 1,
                name: route.route_name.clone(),
                demand: route.max_volume_ap,
            });
            demands.desired_demand = demands.desired_demand.max(route.max_volume_ap);
        }
        demands
    }

    pub fn analyze_system_with_headway(
        &self,
        desired_demand: f64,
        cycle_time: f64,
        headway: f64,
        bus_capacity: f64,
    ) -> SystemAnalysis {
        size_fleet_with_area(
            desired_demand,
            cycle_time,
            headway,
            bus_capacity,
            self.area_per_bus,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(name: &str, stops: &str, runtime: CellValue, demand: f64) -> Route {
        Route::new(name, Some(stops), runtime, demand)
    }

    #[test]
    fn test_extract_stops_drops_empty_segments() {
        assert_eq!(
            RouteAnalyzer::extract_stops(Some("747 → 3972 →  → 3968")),
            vec!["747", "3972", "3968"]
        );
    }

    #[test]
    fn test_extract_stops_missing() {
        assert!(RouteAnalyzer::extract_stops(None).is_empty());
        assert!(RouteAnalyzer::extract_stops(Some("")).is_empty());
    }

    #[test]
    fn test_convert_runtime_string_with_suffix() {
        let minutes = RouteAnalyzer::convert_runtime_to_minutes(&CellValue::text("120s"));
        assert!((minutes - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_convert_runtime_number() {
        let minutes = RouteAnalyzer::convert_runtime_to_minutes(&CellValue::Number(90.0));
        assert!((minutes - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_convert_runtime_bad_input_is_zero() {
        assert_eq!(RouteAnalyzer::convert_runtime_to_minutes(&CellValue::text("bad")), 0.0);
        assert_eq!(RouteAnalyzer::convert_runtime_to_minutes(&CellValue::Empty), 0.0);
        assert_eq!(RouteAnalyzer::convert_runtime_to_minutes(&CellValue::text("inf")), 0.0);
    }

    #[test]
    fn test_cycle_time_sums_runtime_and_dwell() {
        let analyzer = RouteAnalyzer::new(3.0);
        let routes = vec![
            route("A", "1 → 2 → 3", CellValue::text("600s"), 100.0),
            route("B", "3 → 2", CellValue::Number(300.0), 80.0),
        ];
        // 10 + 5 minutes running, 5 stops at 3 minutes
        assert!((analyzer.calculate_cycle_time(&routes) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_cycle_time_malformed_runtime_contributes_zero() {
        let analyzer = RouteAnalyzer::new(2.0);
        let routes = vec![route("A", "1 → 2", CellValue::text("n/a"), 10.0)];
        assert!((analyzer.calculate_cycle_time(&routes) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_route_demands_takes_maximum() {
        let analyzer = RouteAnalyzer::default();
        let routes = vec![
            route("A", "1", CellValue::Empty, 420.0),
            route("B", "2", CellValue::Empty, 510.0),
            route("C", "3", CellValue::Empty, 510.0),
        ];
        let demands = analyzer.get_route_demands(&routes);
        assert_eq!(demands.desired_demand, 510.0);
        assert_eq!(demands.routes.len(), 3);
        assert_eq!(demands.routes[0].index, 1);
        assert_eq!(demands.routes[1].name, "B");
        assert_eq!(demands.demand(1), Some(420.0));
        assert_eq!(demands.demand(4), None);
    }

    #[test]
    fn test_route_demands_empty_line() {
        let demands = RouteAnalyzer::default().get_route_demands(&[]);
        assert_eq!(demands.desired_demand, 0.0);
        assert!(demands.routes.is_empty());
    }
}
