use fleetplan_types::CellValue;
use serde::{Deserialize, Serialize};

/// Separator between stop numbers in a stops array string
pub const STOP_DELIMITER: char = '→';

/// One route of a transit line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub route_name: String,
    /// Stops array as it appeared in the input (`747 → 3972 → 748`)
    pub stops_text: String,
    pub stop_sequence: Vec<String>,
    /// LINKRUNTIME cell, seconds as a number or a string like `"120s"`
    pub link_runtime: CellValue,
    pub max_volume_ap: f64,
    pub hub_name: Option<String>,
}

impl Route {
    pub fn new(
        route_name: impl Into<String>,
        stops_text: Option<&str>,
        link_runtime: CellValue,
        max_volume_ap: f64,
    ) -> Self {
        Self {
            route_name: route_name.into(),
            stops_text: stops_text.unwrap_or_default().to_string(),
            stop_sequence: split_stops(stops_text),
            link_runtime,
            max_volume_ap,
            hub_name: None,
        }
    }

    pub fn with_hub_name(mut self, hub_name: impl Into<String>) -> Self {
        self.hub_name = Some(hub_name.into());
        self
    }

    pub fn stop_count(&self) -> usize {
        self.stop_sequence.len()
    }
}

/// Split a stops array on the arrow delimiter, dropping empty segments
pub fn split_stops(stops_text: Option<&str>) -> Vec<String> {
    match stops_text {
        Some(text) => text
            .split(STOP_DELIMITER)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        None => Vec::new(),
    }
}
