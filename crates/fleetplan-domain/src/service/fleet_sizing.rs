//! Fleet sizing for one demand / headway / capacity configuration

use crate::model::SystemAnalysis;

/// Parking footprint reserved per bus at the hub
pub const DEFAULT_AREA_PER_BUS: f64 = 70.0;

const MINUTES_PER_HOUR: f64 = 60.0;

/// Size the fleet with the default area per bus
pub fn size_fleet(
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
        DEFAULT_AREA_PER_BUS,
    )
}

/// Buses per dispatch group, fleet size, hub area and spare capacity.
///
/// Non-positive demand or cycle time yields [`SystemAnalysis::ZERO`]; so does
/// a non-positive headway or bus capacity. Every count is rounded up.
pub fn size_fleet_with_area(
    desired_demand: f64,
    cycle_time: f64,
    headway: f64,
    bus_capacity: f64,
    area_per_bus: f64,
) -> SystemAnalysis {
    // Negated comparisons so NaN also falls through to the zero result
    if !(desired_demand > 0.0 && cycle_time > 0.0) {
        return SystemAnalysis::ZERO;
    }
    if !(headway > 0.0 && bus_capacity > 0.0) || !headway.is_finite() || !bus_capacity.is_finite() {
        return SystemAnalysis::ZERO;
    }

    let groups_per_hour = (MINUTES_PER_HOUR / headway).ceil();
    let required_capacity_per_group = desired_demand / groups_per_hour;
    let buses_per_group = (required_capacity_per_group / bus_capacity).ceil();
    let total_trips = (desired_demand / bus_capacity).ceil();
    let actual_capacity_per_group = buses_per_group * bus_capacity;
    let capacity_per_hour = actual_capacity_per_group * groups_per_hour;
    let groups_in_service = cycle_time / headway;
    let unique_groups = groups_in_service.ceil();
    // Bounded by groups dispatched per hour, not only by groups on the road
    // Counts saturate at u32::MAX; hub area follows the reported fleet size
    let fleet_size = (groups_per_hour.min(unique_groups) * buses_per_group) as u32;

    SystemAnalysis {
        buses_per_group: buses_per_group as u32,
        total_trips: total_trips as u32,
        groups_per_hour: groups_per_hour as u32,
        unique_groups: unique_groups as u32,
        fleet_size,
        hub_area: fleet_size as f64 * area_per_bus,
        capacity_per_hour,
        empty_seats_per_hour: capacity_per_hour - desired_demand,
    }
}
