//! Operational plan rows over bus capacity × headway combinations

use crate::model::plan::round1;
use crate::model::{Line, LinePreview, OperationalPlan, PlanRow, RouteColumns};

use super::route_analyzer::RouteAnalyzer;

/// One row per (bus capacity, headway), capacity-major
pub fn build_operational_plan(
    line: &Line,
    analyzer: &RouteAnalyzer,
    bus_capacities: &[u32],
    headways: &[u32],
) -> OperationalPlan {
    let demands = analyzer.get_route_demands(&line.routes);
    let cycle_time = analyzer.calculate_cycle_time(&line.routes);
    let hub_name = line.hub_name().to_string();

    let route_columns: Vec<RouteColumns> = line
        .routes
        .iter()
        .map(|r| RouteColumns {
            name: r.route_name.clone(),
            stops: r.stops_text.clone(),
            demand: r.max_volume_ap,
        })
        .collect();

    let mut rows = Vec::with_capacity(bus_capacities.len() * headways.len());
    for &bus_capacity in bus_capacities {
        for &headway in headways {
            let analysis = analyzer.analyze_system_with_headway(
                demands.desired_demand,
                cycle_time,
                headway as f64,
                bus_capacity as f64,
            );
            rows.push(PlanRow {
                hub_name: hub_name.clone(),
                routes: route_columns.clone(),
                desired_demand: demands.desired_demand,
                bus_capacity,
                headway,
                cycle_time: round1(cycle_time),
                analysis,
            });
        }
    }

    log::debug!(
        "line {}: demand {:.0}, cycle {:.1} min, {} plan rows",
        line.name,
        demands.desired_demand,
        cycle_time,
        rows.len()
    );

    OperationalPlan {
        line_name: line.name.clone(),
        safe_line_name: line.safe_name(),
        hub_name,
        desired_demand: demands.desired_demand,
        cycle_time,
        rows,
    }
}

pub fn preview_line(line: &Line, analyzer: &RouteAnalyzer) -> LinePreview {
    let demands = analyzer.get_route_demands(&line.routes);
    LinePreview {
        line_name: line.name.clone(),
        routes: line.route_names(),
        hub_name: line.hub_name().to_string(),
        route1_demand: demands.demand(1),
        route2_demand: demands.demand(2),
        max_demand: demands.desired_demand,
        cycle_time: analyzer.calculate_cycle_time(&line.routes),
    }
}
