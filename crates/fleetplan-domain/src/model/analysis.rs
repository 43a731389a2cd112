use serde::{Deserialize, Serialize};

/// Fleet plan for one (line, bus capacity, headway) combination
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemAnalysis {
    pub buses_per_group: u32,
    pub total_trips: u32,
    pub groups_per_hour: u32,
    pub unique_groups: u32,
    pub fleet_size: u32,
    pub hub_area: f64,
    pub capacity_per_hour: f64,
    pub empty_seats_per_hour: f64,
}

impl SystemAnalysis {
    /// Result for degenerate inputs: every field zero
    pub const ZERO: SystemAnalysis = SystemAnalysis {
        buses_per_group: 0,
        total_trips: 0,
        groups_per_hour: 0,
        unique_groups: 0,
        fleet_size: 0,
        hub_area: 0.0,
        capacity_per_hour: 0.0,
        empty_seats_per_hour: 0.0,
    };

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}
