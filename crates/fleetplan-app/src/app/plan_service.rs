//! Plan Service - operational plans for every line of a stop-sequence table

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use fleetplan_domain::model::{LinePreview, OperationalPlan};
use fleetplan_domain::service::{build_operational_plan, preview_line, RouteAnalyzer};
use fleetplan_infra::line_loader::load_lines;
use fleetplan_infra::xlsx_writer::{write_table, TableStyle};
use fleetplan_types::{CellValue, Error, Result};
use serde::Serialize;

use crate::config::Config;

/// Folder created under the output directory
pub const PLANS_DIR: &str = "Operational_Plans";

/// One written plan file
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPlan {
    pub line_name: String,
    pub hub_name: String,
    pub desired_demand: f64,
    pub rows: usize,
    pub path: PathBuf,
}

/// Summary of a plan generation run
#[derive(Debug, Clone, Serialize)]
pub struct PlanRunReport {
    pub input: PathBuf,
    pub plans_dir: PathBuf,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub lines_loaded: usize,
    pub generated: Vec<GeneratedPlan>,
}

impl PlanRunReport {
    pub fn elapsed_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

/// Load lines and summarise each one
pub fn load_line_previews(input: &Path, analyzer: &RouteAnalyzer) -> Result<Vec<LinePreview>> {
    let lines = load_lines(input)?;
    Ok(lines.iter().map(|line| preview_line(line, analyzer)).collect())
}

/// Write one plan into `plans_dir`
pub fn write_plan(plan: &OperationalPlan, plans_dir: &Path) -> Result<PathBuf> {
    let path = plans_dir.join(plan.file_name());
    let rows: Vec<Vec<CellValue>> = plan.rows.iter().map(|row| row.cells()).collect();
    write_table(
        &path,
        OperationalPlan::SHEET_NAME,
        &plan.headers(),
        &rows,
        TableStyle::Highlighted,
    )?;
    Ok(path)
}

/// Generate a plan file per line.
///
/// Invalid configuration aborts before anything is written; a failed write
/// aborts the remaining lines. `on_line` is called after each file.
pub fn generate_plans<F>(
    input: &Path,
    output_dir: &Path,
    config: &Config,
    mut on_line: F,
) -> Result<PlanRunReport>
where
    F: FnMut(&GeneratedPlan),
{
    config.validate()?;
    let started_at = Local::now();

    let lines = load_lines(input)?;
    if lines.is_empty() {
        return Err(Error::InvalidInput(format!(
            "no lines found in {}",
            input.display()
        )));
    }

    let plans_dir = output_dir.join(PLANS_DIR);
    std::fs::create_dir_all(&plans_dir)?;

    let analyzer = config.analyzer();
    let mut generated = Vec::with_capacity(lines.len());
    let mut file_names = HashSet::new();

    for line in &lines {
        let plan = build_operational_plan(line, &analyzer, &config.bus_capacities, &config.headways);
        if !file_names.insert(plan.file_name()) {
            log::warn!(
                "line '{}' maps to {} which was already written, overwriting",
                line.name,
                plan.file_name()
            );
        }
        let path = write_plan(&plan, &plans_dir)?;
        let entry = GeneratedPlan {
            line_name: plan.line_name.clone(),
            hub_name: plan.hub_name.clone(),
            desired_demand: plan.desired_demand,
            rows: plan.rows.len(),
            path,
        };
        on_line(&entry);
        generated.push(entry);
    }

    let report = PlanRunReport {
        input: input.to_path_buf(),
        plans_dir,
        started_at,
        finished_at: Local::now(),
        lines_loaded: lines.len(),
        generated,
    };
    log::info!(
        "generated {} operational plans in {} ({:.1}s)",
        report.generated.len(),
        report.plans_dir.display(),
        report.elapsed_secs()
    );
    Ok(report)
}
