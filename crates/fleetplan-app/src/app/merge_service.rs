//! Merge Service - build the stop-sequence table from a model export
//!
//! 1. Detect the lineroute items / lineroutes sheets
//! 2. Clean and group stop items per (line, route)
//! 3. Join route attributes and write one row per route

use std::path::{Path, PathBuf};

use fleetplan_domain::model::StopSequenceRow;
use fleetplan_domain::service::build_stop_sequences;
use fleetplan_infra::route_tables::{load_route_tables, DetectedSheets};
use fleetplan_infra::schema::columns;
use fleetplan_infra::xlsx_writer::{write_table, TableStyle};
use fleetplan_types::{CellValue, Result};
use serde::Serialize;

const OUTPUT_SHEET: &str = "Sheet1";

/// What a merge run produced
#[derive(Debug, Clone, Serialize)]
pub struct MergeOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub line_route_items_sheet: String,
    pub line_routes_sheet: String,
    pub routes: usize,
    pub null_removed: usize,
    pub duplicates_removed: usize,
}

/// `<stem>_stop_sequences.xlsx` beside the input
pub fn default_merge_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("routes");
    input.with_file_name(format!("{}_stop_sequences.xlsx", stem))
}

pub fn stop_sequence_headers() -> Vec<String> {
    [
        columns::LINE_NAME,
        columns::LINE_ROUTE_NAME,
        columns::STOPS_ARRAY,
        columns::HUB_NAME,
        columns::LINK_RUNTIME,
        columns::MAX_VOLUME_AP,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn row_cells(row: &StopSequenceRow) -> Vec<CellValue> {
    vec![
        CellValue::text(row.line_name.as_str()),
        CellValue::text(row.line_route_name.as_str()),
        CellValue::text(row.stops_array.as_str()),
        CellValue::text(row.hub_name.as_str()),
        row.link_runtime.clone(),
        row.max_volume_ap.clone(),
    ]
}

pub fn merge_stop_sequences(
    input: &Path,
    output: &Path,
    hub_patterns: &[String],
) -> Result<MergeOutcome> {
    let tables = load_route_tables(input)?;
    let DetectedSheets {
        line_route_items,
        line_routes,
    } = tables.sheets;

    let report = build_stop_sequences(&tables.items, &tables.attributes, hub_patterns);
    log::info!(
        "processed {} routes, removed {} null and {} duplicate stop entries",
        report.rows.len(),
        report.null_removed,
        report.duplicates_removed
    );

    let rows: Vec<Vec<CellValue>> = report.rows.iter().map(row_cells).collect();
    write_table(
        output,
        OUTPUT_SHEET,
        &stop_sequence_headers(),
        &rows,
        TableStyle::Plain,
    )?;
    log::info!("stop sequences written to {}", output.display());

    Ok(MergeOutcome {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        line_route_items_sheet: line_route_items,
        line_routes_sheet: line_routes,
        routes: report.rows.len(),
        null_removed: report.null_removed,
        duplicates_removed: report.duplicates_removed,
    })
}
