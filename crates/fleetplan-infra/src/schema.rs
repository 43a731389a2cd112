//! Sheet and column detection.
//!
//! Model exports name sheets and columns inconsistently, so each lookup is an
//! ordered list of candidates tried in priority order. The first match wins;
//! no match is a [`SchemaError`].

use fleetplan_types::SchemaError;

use crate::workbook::Sheet;

/// Column names used by the route sheets and the stop-sequence table
pub mod columns {
    pub const LINE_NAME: &str = "$LINEROUTEITEM:LINENAME";
    pub const LINE_ROUTE_NAME: &str = "LINEROUTENAME";
    pub const STOP_POINT_NO: &str = "STOPPOINTNO";
    pub const STOP_POINT_NO_ALT: &str = "SSTOPPOINT:NO";
    pub const STOP_NAME_CANDIDATES: &[&str] =
        &["STOPPOINT\\NAME", "STOPPOINT/NAME", "STOPPOINT NAME"];
    pub const NAME: &str = "NAME";
    pub const LINK_RUNTIME: &str = "LINKRUNTIME";
    pub const MAX_VOLUME_AP: &str = "MAX:LINEROUTEITEMS\\VOL(AP)";
    pub const STOPS_ARRAY: &str = "StopsArray";
    pub const HUB_NAME: &str = "HubName";
    pub const BUS_CAPACITY: &str = "Bus_Capacity";
    pub const HEADWAY: &str = "Headway (min)";
    pub const HUB_AREA: &str = "Hub_Area";
}

/// How a sheet name is recognised (case-insensitive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetMatcher {
    Exact(&'static str),
    Contains(&'static str),
}

impl SheetMatcher {
    pub fn matches(&self, sheet_name: &str) -> bool {
        let lower = sheet_name.to_lowercase();
        match self {
            SheetMatcher::Exact(name) => lower == *name,
            SheetMatcher::Contains(fragment) => lower.contains(fragment),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            SheetMatcher::Exact(name) => format!("'{}'", name),
            SheetMatcher::Contains(fragment) => format!("*{}*", fragment),
        }
    }
}

pub const LINE_ROUTE_ITEMS_SHEET: &[SheetMatcher] = &[
    SheetMatcher::Contains("lineroute items"),
    SheetMatcher::Contains("lineroute item"),
];

pub const LINE_ROUTES_SHEET: &[SheetMatcher] = &[
    SheetMatcher::Exact("lineroutes"),
    SheetMatcher::Contains("lineroutes"),
];

/// First sheet matching the highest-priority matcher, skipping `exclude`
pub fn detect_sheet<'a>(
    names: &'a [String],
    matchers: &[SheetMatcher],
    exclude: Option<&str>,
) -> Option<&'a str> {
    matchers.iter().find_map(|matcher| {
        names
            .iter()
            .map(String::as_str)
            .find(|name| Some(*name) != exclude && matcher.matches(name))
    })
}

pub fn require_sheet<'a>(
    names: &'a [String],
    matchers: &[SheetMatcher],
    exclude: Option<&str>,
    role: &str,
) -> Result<&'a str, SchemaError> {
    detect_sheet(names, matchers, exclude).ok_or_else(|| {
        let tried: Vec<String> = matchers.iter().map(SheetMatcher::describe).collect();
        SchemaError::SheetNotFound(format!("{} (tried {})", role, tried.join(", ")))
    })
}

/// A named set of columns that must all be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

pub const LINE_ROUTE_ITEM_SCHEMAS: &[ColumnSchema] = &[
    ColumnSchema {
        name: "stoppointno",
        columns: &[columns::LINE_NAME, columns::LINE_ROUTE_NAME, columns::STOP_POINT_NO],
    },
    ColumnSchema {
        name: "sstoppoint",
        columns: &[columns::LINE_NAME, columns::LINE_ROUTE_NAME, columns::STOP_POINT_NO_ALT],
    },
];

impl ColumnSchema {
    pub fn missing(&self, sheet: &Sheet) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| !sheet.has_column(c))
            .map(|c| c.to_string())
            .collect()
    }

    /// Column indexes in schema order
    pub fn indexes(&self, sheet: &Sheet) -> Result<Vec<usize>, SchemaError> {
        require_columns(sheet, self.columns)
    }
}

/// First schema whose columns are all present. On failure the missing columns
/// of the last candidate are reported.
pub fn match_schema<'s>(
    sheet: &Sheet,
    candidates: &'s [ColumnSchema],
) -> Result<&'s ColumnSchema, SchemaError> {
    let mut missing = Vec::new();
    for schema in candidates {
        missing = schema.missing(sheet);
        if missing.is_empty() {
            log::debug!("sheet '{}' matches schema {}", sheet.name, schema.name);
            return Ok(schema);
        }
    }
    Err(SchemaError::MissingColumns {
        sheet: sheet.name.clone(),
        columns: missing,
    })
}

/// Index of the first candidate column present in the sheet
pub fn find_column(sheet: &Sheet, role: &str, candidates: &[&str]) -> Result<usize, SchemaError> {
    candidates
        .iter()
        .find_map(|c| sheet.column_index(c))
        .ok_or_else(|| SchemaError::NoColumnMatch {
            sheet: sheet.name.clone(),
            role: role.to_string(),
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
        })
}

/// Indexes of all `columns`, or every missing name
pub fn require_columns(sheet: &Sheet, columns: &[&str]) -> Result<Vec<usize>, SchemaError> {
    let missing: Vec<String> = columns
        .iter()
        .filter(|c| !sheet.has_column(c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns {
            sheet: sheet.name.clone(),
            columns: missing,
        });
    }
    Ok(columns
        .iter()
        .filter_map(|c| sheet.column_index(c))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn sheet_with(headers: &[&str]) -> Sheet {
        Sheet {
            name: "items".to_string(),
            headers: names(headers),
            rows: vec![],
        }
    }

    #[test]
    fn test_detect_items_sheet_prefers_plural() {
        let sheets = names(&["Lineroute item (old)", "LineRoute Items", "Lineroutes"]);
        assert_eq!(
            detect_sheet(&sheets, LINE_ROUTE_ITEMS_SHEET, None),
            Some("LineRoute Items")
        );
    }

    #[test]
    fn test_detect_items_sheet_falls_back_to_singular() {
        let sheets = names(&["Lineroutes", "lineroute item"]);
        assert_eq!(
            detect_sheet(&sheets, LINE_ROUTE_ITEMS_SHEET, None),
            Some("lineroute item")
        );
    }

    #[test]
    fn test_detect_routes_sheet_exact_then_contains() {
        let sheets = names(&["All Lineroutes 2024", "LINEROUTES"]);
        assert_eq!(detect_sheet(&sheets, LINE_ROUTES_SHEET, None), Some("LINEROUTES"));

        let sheets = names(&["Lineroutes items", "South lineroutes"]);
        assert_eq!(
            detect_sheet(&sheets, LINE_ROUTES_SHEET, Some("Lineroutes items")),
            Some("South lineroutes")
        );
    }

    #[test]
    fn test_require_sheet_reports_not_found() {
        let sheets = names(&["Sheet1"]);
        let err = require_sheet(&sheets, LINE_ROUTES_SHEET, None, "lineroutes").unwrap_err();
        assert!(matches!(err, SchemaError::SheetNotFound(_)));
    }

    #[test]
    fn test_match_schema_in_priority_order() {
        let sheet = sheet_with(&[columns::LINE_NAME, columns::LINE_ROUTE_NAME, columns::STOP_POINT_NO_ALT]);
        let schema = match_schema(&sheet, LINE_ROUTE_ITEM_SCHEMAS).unwrap();
        assert_eq!(schema.name, "sstoppoint");
        assert_eq!(schema.indexes(&sheet).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_match_schema_reports_missing() {
        let sheet = sheet_with(&[columns::LINE_NAME]);
        match match_schema(&sheet, LINE_ROUTE_ITEM_SCHEMAS) {
            Err(SchemaError::MissingColumns { columns, .. }) => {
                assert_eq!(columns, vec!["LINEROUTENAME", "SSTOPPOINT:NO"]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_find_column_first_candidate() {
        let sheet = sheet_with(&["STOPPOINT NAME", "STOPPOINT/NAME"]);
        assert_eq!(
            find_column(&sheet, "stop name", columns::STOP_NAME_CANDIDATES).unwrap(),
            1
        );
        let sheet = sheet_with(&["NAME"]);
        assert!(find_column(&sheet, "stop name", columns::STOP_NAME_CANDIDATES).is_err());
    }
}
