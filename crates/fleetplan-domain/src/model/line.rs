use serde::{Deserialize, Serialize};

use super::route::Route;

/// Hub name reported for a line without routes
pub const UNKNOWN_LINE_HUB: &str = "N/A";

/// A transit line and its routes, in input order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub name: String,
    pub routes: Vec<Route>,
}

impl Line {
    pub fn new(name: impl Into<String>, routes: Vec<Route>) -> Self {
        Self {
            name: name.into(),
            routes,
        }
    }

    /// Hub of the first route. Routes of one line are assumed to share a hub.
    pub fn hub_name(&self) -> &str {
        self.routes
            .first()
            .and_then(|r| r.hub_name.as_deref())
            .unwrap_or(UNKNOWN_LINE_HUB)
    }

    /// Route names joined for display
    pub fn route_names(&self) -> String {
        self.routes
            .iter()
            .map(|r| r.route_name.as_str())
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// File-name-safe form of the line name
    pub fn safe_name(&self) -> String {
        let kept: String = self
            .name
            .chars()
            .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
            .collect();
        kept.trim_end().to_string()
    }
}
