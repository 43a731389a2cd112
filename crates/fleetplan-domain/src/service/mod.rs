//! Domain services

pub mod fleet_sizing;
pub mod hub_summary;
pub mod plan_assembler;
pub mod route_analyzer;
pub mod stop_sequence;

pub use fleet_sizing::{size_fleet, size_fleet_with_area, DEFAULT_AREA_PER_BUS};
pub use hub_summary::{combine_hub_areas, short_name, HubFileAreas};
pub use plan_assembler::{build_operational_plan, preview_line};
pub use route_analyzer::{RouteAnalyzer, RouteDemand, RouteDemands, DEFAULT_DWELL_TIME};
pub use stop_sequence::{build_stop_sequences, extract_hub_name, format_stop_number, StopSequenceReport};
