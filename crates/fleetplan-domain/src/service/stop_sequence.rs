//! Merge lineroute items with lineroute attributes into stop sequences

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use fleetplan_types::CellValue;
use serde::{Deserialize, Serialize};

use crate::model::{LineRouteAttributes, LineRouteItem, StopSequenceRow};

/// Hub name used when no pattern matches a line's first stop
pub const UNKNOWN_HUB: &str = "Unknown Hub";

/// Separator used when writing stop sequences
pub const STOPS_JOINER: &str = " → ";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StopSequenceReport {
    pub rows: Vec<StopSequenceRow>,
    /// Items dropped for an empty stop number
    pub null_removed: usize,
    /// Items dropped as repeated (line, route, stop)
    pub duplicates_removed: usize,
}

impl StopSequenceReport {
    pub fn total_removed(&self) -> usize {
        self.null_removed + self.duplicates_removed
    }
}

/// Hub of a line: the first configured pattern found in its first named stop
pub fn extract_hub_name<'a, I>(stop_names: I, hub_patterns: &[String]) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let first = stop_names.into_iter().find(|name| !name.trim().is_empty());
    if let Some(name) = first {
        if let Some(pattern) = hub_patterns.iter().find(|p| name.contains(p.as_str())) {
            return pattern.clone();
        }
    }
    UNKNOWN_HUB.to_string()
}

/// Stop numbers read as floats (`747.0`) are written as integers
pub fn format_stop_number(stop: &CellValue) -> String {
    let numeric = match stop {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => s.trim().parse::<f64>().ok(),
        CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        CellValue::Empty => None,
    };
    match numeric {
        Some(n) if n.is_finite() => (n.trunc() as i64).to_string(),
        _ => stop.to_string(),
    }
}

/// Order names numerically when both parse as numbers, otherwise as text.
/// Numeric names sort before text names.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// (line, route) grouping key ordered with [`compare_names`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GroupKey<'a> {
    line: &'a str,
    route: &'a str,
}

impl Ord for GroupKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_names(self.line, other.line).then_with(|| compare_names(self.route, other.route))
    }
}

impl PartialOrd for GroupKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Clean, group and join the two route sheets.
///
/// Groups are ordered by line name then route name, numeric names by value. A route matching several
/// attribute rows yields one output row per match; a route with no match keeps
/// empty runtime and volume.
pub fn build_stop_sequences(
    items: &[LineRouteItem],
    attributes: &[LineRouteAttributes],
    hub_patterns: &[String],
) -> StopSequenceReport {
    let with_stop: Vec<&LineRouteItem> = items
        .iter()
        .filter(|item| !item.stop_point_no.is_blank())
        .collect();
    let null_removed = items.len() - with_stop.len();

    let mut seen = HashSet::new();
    let clean: Vec<&LineRouteItem> = with_stop
        .into_iter()
        .filter(|item| {
            seen.insert((
                item.line_name.clone(),
                item.line_route_name.clone(),
                item.stop_point_no.to_string(),
            ))
        })
        .collect();
    let duplicates_removed = items.len() - null_removed - clean.len();


    let mut line_stop_names: HashMap<&str, Vec<&str>> = HashMap::new();
    for item in &clean {
        let names = line_stop_names.entry(item.line_name.as_str()).or_default();
        if let Some(name) = item.stop_name.as_deref() {
            names.push(name);
        }
    }
    let line_hubs: HashMap<&str, String> = line_stop_names
        .into_iter()
        .map(|(line, names)| (line, extract_hub_name(names, hub_patterns)))
        .collect();

    let mut groups: BTreeMap<GroupKey, Vec<&LineRouteItem>> = BTreeMap::new();
    for item in &clean {
        if item.line_name.is_empty() || item.line_route_name.is_empty() {
            log::debug!("skipping item without line or route name: {:?}", item);
            continue;
        }
        groups
            .entry(GroupKey {
                line: item.line_name.as_str(),
                route: item.line_route_name.as_str(),
            })
            .or_default()
            .push(item);
    }

    let mut rows = Vec::new();
    for (GroupKey { line: line_name, route: route_name }, group) in groups {
        let stops_array = group
            .iter()
            .map(|item| format_stop_number(&item.stop_point_no))
            .collect::<Vec<_>>()
            .join(STOPS_JOINER);
        let hub_name = line_hubs
            .get(line_name)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_HUB.to_string());

        let matches: Vec<&LineRouteAttributes> = attributes
            .iter()
            .filter(|a| a.name == route_name)
            .collect();
        if matches.is_empty() {
            log::warn!("no lineroutes entry for {}", route_name);
            rows.push(StopSequenceRow {
                line_name: line_name.to_string(),
                line_route_name: route_name.to_string(),
                stops_array,
                hub_name,
                link_runtime: CellValue::Empty,
                max_volume_ap: CellValue::Empty,
            });
            continue;
        }
        for attrs in matches {
            rows.push(StopSequenceRow {
                line_name: line_name.to_string(),
                line_route_name: route_name.to_string(),
                stops_array: stops_array.clone(),
                hub_name: hub_name.clone(),
                link_runtime: attrs.link_runtime.clone(),
                max_volume_ap: attrs.max_volume_ap.clone(),
            });
        }
    }

    let report = StopSequenceReport {
        rows,
        null_removed,
        duplicates_removed,
    };
    if report.total_removed() > 0 {
        log::info!(
            "removed {} stop entries ({} null, {} duplicate)",
            report.total_removed(),
            report.null_removed,
            report.duplicates_removed
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> Vec<String> {
        ["Ext. Hub01", "Ext. Hub02", "Gate3"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn item(line: &str, route: &str, stop: CellValue, name: Option<&str>) -> LineRouteItem {
        LineRouteItem::new(line, route, stop, name)
    }

    fn attrs(name: &str, runtime: CellValue, volume: f64) -> LineRouteAttributes {
        LineRouteAttributes {
            name: name.to_string(),
            link_runtime: runtime,
            max_volume_ap: CellValue::Number(volume),
        }
    }

    #[test]
    fn test_extract_hub_name() {
        let p = patterns();
        assert_eq!(extract_hub_name(["", "Ext. Hub02 North"], &p), "Ext. Hub02");
        assert_eq!(extract_hub_name(["Gate3 - bay 4", "Ext. Hub01"], &p), "Gate3");
        assert_eq!(extract_hub_name(["Market St", "Gate3"], &p), UNKNOWN_HUB);
        assert_eq!(extract_hub_name(Vec::<&str>::new(), &p), UNKNOWN_HUB);
    }

    #[test]
    fn test_format_stop_number() {
        assert_eq!(format_stop_number(&CellValue::Number(747.0)), "747");
        assert_eq!(format_stop_number(&CellValue::text("3972.0")), "3972");
        assert_eq!(format_stop_number(&CellValue::text("A12")), "A12");
    }

    #[test]
    fn test_build_stop_sequences() {
        let items = vec![
            item("L2", "L2-A", CellValue::Number(10.0), Some("Gate3 stand")),
            item("L1", "L1-B", CellValue::Number(5.0), Some("Ext. Hub01 bay")),
            item("L1", "L1-A", CellValue::Number(747.0), Some("Ext. Hub01 bay")),
            item("L1", "L1-A", CellValue::Number(3972.0), Some("Market")),
            item("L1", "L1-A", CellValue::Empty, Some("Ghost")),
            item("L1", "L1-A", CellValue::Number(3972.0), Some("Market")),
            item("L1", "L1-A", CellValue::Number(748.0), Some("Depot")),
            item("L2", "L2-A", CellValue::Number(11.0), None),
        ];
        let attributes = vec![
            attrs("L1-A", CellValue::text("600s"), 500.0),
            attrs("L1-B", CellValue::Number(300.0), 250.0),
        ];

        let report = build_stop_sequences(&items, &attributes, &patterns());
        assert_eq!(report.null_removed, 1);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(report.rows.len(), 3);

        let first = &report.rows[0];
        assert_eq!(first.line_name, "L1");
        assert_eq!(first.line_route_name, "L1-A");
        assert_eq!(first.stops_array, "747 → 3972 → 748");
        assert_eq!(first.hub_name, "Ext. Hub01");
        assert_eq!(first.link_runtime, CellValue::text("600s"));
        assert_eq!(first.max_volume_ap, CellValue::Number(500.0));

        assert_eq!(report.rows[1].line_route_name, "L1-B");
        let last = &report.rows[2];
        assert_eq!(last.hub_name, "Gate3");
        assert_eq!(last.stops_array, "10 → 11");
        assert_eq!(last.link_runtime, CellValue::Empty);
    }

    #[test]
    fn test_duplicate_attribute_rows_repeat_route() {
        let items = vec![item("L1", "R", CellValue::Number(1.0), None)];
        let attributes = vec![
            attrs("R", CellValue::Number(60.0), 10.0),
            attrs("R", CellValue::Number(120.0), 20.0),
        ];
        let report = build_stop_sequences(&items, &attributes, &patterns());
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].hub_name, UNKNOWN_HUB);
        assert_eq!(report.rows[1].max_volume_ap, CellValue::Number(20.0));
    }

    #[test]
    fn test_numeric_line_names_sort_by_value() {
        let items = vec![
            item("10", "1", CellValue::Number(1.0), None),
            item("L1", "A", CellValue::Number(2.0), None),
            item("2", "10", CellValue::Number(3.0), None),
            item("2", "9", CellValue::Number(4.0), None),
        ];
        let report = build_stop_sequences(&items, &[], &patterns());
        let keys: Vec<(&str, &str)> = report
            .rows
            .iter()
            .map(|r| (r.line_name.as_str(), r.line_route_name.as_str()))
            .collect();
        assert_eq!(keys, vec![("2", "9"), ("2", "10"), ("10", "1"), ("L1", "A")]);
    }

    #[test]
    fn test_compare_names() {
        assert_eq!(compare_names("2", "10"), Ordering::Less);
        assert_eq!(compare_names("L10", "L2"), Ordering::Less);
        assert_eq!(compare_names("99", "A"), Ordering::Less);
        assert_eq!(compare_names("3", "3"), Ordering::Equal);
    }
}
