//! Combine hub areas of plan files that share a hub

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::{HubAreaRecord, HubSummary, HubSummaryRow};

/// Hub-area rows contributed by one plan file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubFileAreas {
    /// File stem, used to name the file's column
    pub source: String,
    pub records: Vec<HubAreaRecord>,
}

/// Last `_`-separated word of a file stem, in title case
pub fn short_name(stem: &str) -> String {
    let last = stem.rsplit('_').next().unwrap_or(stem);
    title_case(last)
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

fn area_column_name(source: &str, taken: &[String]) -> String {
    let base = format!("Hub_Area_{}", short_name(source).replace(' ', "_"));
    if !taken.contains(&base) {
        return base;
    }
    (2..)
        .map(|n| format!("{}_{}", base, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(base)
}

/// Outer-join every file's hub areas on (bus capacity, headway).
///
/// Rows are sorted by the key columns; a key missing from a file counts as
/// zero area. Returns `None` when no file contributes a row.
pub fn combine_hub_areas(hub_name: &str, files: &[HubFileAreas]) -> Option<HubSummary> {
    let mut area_columns: Vec<String> = Vec::with_capacity(files.len());
    let mut merged: Vec<(f64, f64, Vec<Option<f64>>)> = Vec::new();

    for (col, file) in files.iter().enumerate() {
        let name = area_column_name(&file.source, &area_columns);
        area_columns.push(name);

        for record in &file.records {
            let position = merged
                .iter()
                .position(|(bc, hw, _)| *bc == record.bus_capacity && *hw == record.headway);
            let index = match position {
                Some(i) => i,
                None => {
                    merged.push((record.bus_capacity, record.headway, vec![None; files.len()]));
                    merged.len() - 1
                }
            };
            let cell = &mut merged[index].2[col];
            if cell.is_some() {
                log::debug!(
                    "{}: repeated key ({}, {}) summed",
                    file.source,
                    record.bus_capacity,
                    record.headway
                );
            }
            *cell = Some(cell.unwrap_or(0.0) + record.hub_area);
        }
    }

    if merged.is_empty() {
        return None;
    }

    merged.sort_by(|a, b| match a.0.total_cmp(&b.0) {
        Ordering::Equal => a.1.total_cmp(&b.1),
        other => other,
    });

    let rows = merged
        .into_iter()
        .map(|(bus_capacity, headway, areas)| {
            let areas: Vec<f64> = areas.into_iter().map(|a| a.unwrap_or(0.0)).collect();
            HubSummaryRow {
                bus_capacity,
                headway,
                sum_hub_area: areas.iter().sum(),
                areas,
            }
        })
        .collect();

    Some(HubSummary {
        hub_name: hub_name.to_string(),
        area_columns,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(bus_capacity: f64, headway: f64, hub_area: f64) -> HubAreaRecord {
        HubAreaRecord {
            bus_capacity,
            headway,
            hub_area,
        }
    }

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("Operational_Plan_NORTH"), "North");
        assert_eq!(short_name("Operational_Plan_line 12b"), "Line 12B");
        assert_eq!(short_name("single"), "Single");
    }

    #[test]
    fn test_combine_outer_join_and_sum() {
        let files = vec![
            HubFileAreas {
                source: "Operational_Plan_East".to_string(),
                records: vec![record(50.0, 20.0, 560.0), record(25.0, 10.0, 840.0)],
            },
            HubFileAreas {
                source: "Operational_Plan_West".to_string(),
                records: vec![record(50.0, 20.0, 280.0), record(50.0, 30.0, 140.0)],
            },
        ];
        let summary = combine_hub_areas("Gate3", &files).unwrap();
        assert_eq!(summary.area_columns, vec!["Hub_Area_East", "Hub_Area_West"]);
        assert_eq!(summary.rows.len(), 3);

        let keys: Vec<(f64, f64)> = summary.rows.iter().map(|r| (r.bus_capacity, r.headway)).collect();
        assert_eq!(keys, vec![(25.0, 10.0), (50.0, 20.0), (50.0, 30.0)]);

        assert_eq!(summary.rows[0].areas, vec![840.0, 0.0]);
        assert_eq!(summary.rows[1].sum_hub_area, 840.0);
        assert_eq!(summary.rows[2].areas, vec![0.0, 140.0]);
        assert_eq!(summary.total_hub_area(), 840.0 + 840.0 + 140.0);
        assert_eq!(summary.file_name(), "Summary_Gate3.xlsx");
    }

    #[test]
    fn test_colliding_short_names_are_suffixed() {
        let files = vec![
            HubFileAreas {
                source: "a_Line".to_string(),
                records: vec![record(25.0, 10.0, 70.0)],
            },
            HubFileAreas {
                source: "b_line".to_string(),
                records: vec![record(25.0, 10.0, 70.0)],
            },
        ];
        let summary = combine_hub_areas("Ext. Hub01", &files).unwrap();
        assert_eq!(summary.area_columns, vec!["Hub_Area_Line", "Hub_Area_Line_2"]);
        assert_eq!(summary.file_name(), "Summary_Ext._Hub01.xlsx");
    }

    #[test]
    fn test_combine_without_rows() {
        let files = vec![HubFileAreas {
            source: "x".to_string(),
            records: vec![],
        }];
        assert!(combine_hub_areas("Gate3", &files).is_none());
    }
}
