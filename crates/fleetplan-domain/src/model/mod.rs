//! Domain model types

pub mod analysis;
pub mod hub_area;
pub mod line;
pub mod plan;
pub mod route;
pub mod stop_item;

pub use analysis::SystemAnalysis;
pub use hub_area::{HubAreaRecord, HubSummary, HubSummaryRow};
pub use line::Line;
pub use plan::{LinePreview, OperationalPlan, PlanRow, RouteColumns};
pub use route::{Route, STOP_DELIMITER};
pub use stop_item::{LineRouteAttributes, LineRouteItem, StopSequenceRow};
