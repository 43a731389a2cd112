//! Loader for the two route sheets of a model export

use std::path::Path;

use fleetplan_domain::model::{LineRouteAttributes, LineRouteItem};
use fleetplan_types::Result;

use crate::schema::{
    columns, find_column, match_schema, require_columns, require_sheet, LINE_ROUTES_SHEET,
    LINE_ROUTE_ITEMS_SHEET, LINE_ROUTE_ITEM_SCHEMAS,
};
use crate::workbook::{read_sheet, sheet_names, Sheet};

/// Sheet names picked for the merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedSheets {
    pub line_route_items: String,
    pub line_routes: String,
}

/// Items and attributes read from one workbook
#[derive(Debug, Clone)]
pub struct RouteTables {
    pub sheets: DetectedSheets,
    pub items: Vec<LineRouteItem>,
    pub attributes: Vec<LineRouteAttributes>,
}

pub fn detect_route_sheets(names: &[String]) -> Result<DetectedSheets> {
    let items = require_sheet(names, LINE_ROUTE_ITEMS_SHEET, None, "lineroute items")?;
    let routes = require_sheet(names, LINE_ROUTES_SHEET, Some(items), "lineroutes")?;
    Ok(DetectedSheets {
        line_route_items: items.to_string(),
        line_routes: routes.to_string(),
    })
}

pub fn load_route_tables(path: &Path) -> Result<RouteTables> {
    let names = sheet_names(path)?;
    log::info!("found {} sheets in {}", names.len(), path.display());
    let sheets = detect_route_sheets(&names)?;
    log::info!(
        "using '{}' + '{}'",
        sheets.line_route_items,
        sheets.line_routes
    );

    let items_sheet = read_sheet(path, &sheets.line_route_items)?;
    let routes_sheet = read_sheet(path, &sheets.line_routes)?;

    Ok(RouteTables {
        items: parse_items(&items_sheet)?,
        attributes: parse_attributes(&routes_sheet)?,
        sheets,
    })
}

pub fn parse_items(sheet: &Sheet) -> Result<Vec<LineRouteItem>> {
    let schema = match_schema(sheet, LINE_ROUTE_ITEM_SCHEMAS)?;
    let idx = schema.indexes(sheet)?;
    let (line_col, route_col, stop_col) = (idx[0], idx[1], idx[2]);
    let name_col = find_column(sheet, "stop name", columns::STOP_NAME_CANDIDATES)?;

    let items = (0..sheet.row_count())
        .map(|row| {
            let stop_name = sheet.cell(row, name_col).as_text();
            LineRouteItem::new(
                sheet.cell(row, line_col).as_text().unwrap_or_default(),
                sheet.cell(row, route_col).as_text().unwrap_or_default(),
                sheet.cell(row, stop_col).clone(),
                stop_name.as_deref(),
            )
        })
        .collect();
    Ok(items)
}

pub fn parse_attributes(sheet: &Sheet) -> Result<Vec<LineRouteAttributes>> {
    let idx = require_columns(
        sheet,
        &[columns::NAME, columns::LINK_RUNTIME, columns::MAX_VOLUME_AP],
    )?;

    let attributes = (0..sheet.row_count())
        .filter_map(|row| {
            let name = sheet.cell(row, idx[0]).as_text()?;
            Some(LineRouteAttributes {
                name,
                link_runtime: sheet.cell(row, idx[1]).clone(),
                max_volume_ap: sheet.cell(row, idx[2]).clone(),
            })
        })
        .collect();
    Ok(attributes)
}
