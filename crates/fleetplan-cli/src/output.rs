//! Output formatting module

use fleetplan_app::app::{MergeOutcome, PlanRunReport, SummaryReport};
use fleetplan_app::config::Config;
use fleetplan_domain::model::{LinePreview, SystemAnalysis};
use fleetplan_types::{OutputFormat, Result};
use serde::Serialize;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    println!("{}", content);
    Ok(())
}

fn demand_text(demand: Option<f64>) -> String {
    demand
        .map(|d| format!("{:.0}", d))
        .unwrap_or_else(|| "N/A".to_string())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let cut: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

pub fn output_line_previews(output_format: OutputFormat, previews: &[LinePreview]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(previews);
    }

    println!("\nProcessed Lines ({})", previews.len());
    println!("================");
    println!(
        "{:<20} {:<40} {:<14} {:>10} {:>10} {:>10} {:>10}",
        "Line", "Routes", "Hub", "Route 1", "Route 2", "Max", "Cycle"
    );
    for p in previews {
        println!(
            "{:<20} {:<40} {:<14} {:>10} {:>10} {:>10.0} {:>10.1}",
            truncate(&p.line_name, 20),
            truncate(&p.routes, 40),
            truncate(&p.hub_name, 14),
            demand_text(p.route1_demand),
            demand_text(p.route2_demand),
            p.max_demand,
            p.cycle_time
        );
    }
    Ok(())
}

pub fn output_plan_report(output_format: OutputFormat, report: &PlanRunReport) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(report);
    }

    println!("\nOperational Plans");
    println!("=================");
    println!("Input:      {}", report.input.display());
    println!("Output:     {}", report.plans_dir.display());
    println!("Started:    {}", report.started_at.format("%Y-%m-%d %H:%M:%S"));
    println!("Finished:   {}", report.finished_at.format("%Y-%m-%d %H:%M:%S"));
    println!("Lines:      {}", report.lines_loaded);
    println!("Generated:  {}", report.generated.len());
    println!();
    for plan in &report.generated {
        let file = plan
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        println!(
            "  {:<40} hub {:<14} demand {:>6.0}  ({} rows)",
            file, plan.hub_name, plan.desired_demand, plan.rows
        );
    }
    Ok(())
}

pub fn output_merge(output_format: OutputFormat, outcome: &MergeOutcome) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(outcome);
    }

    println!("\nStop Sequences");
    println!("==============");
    println!("Items sheet:        {}", outcome.line_route_items_sheet);
    println!("Lineroutes sheet:   {}", outcome.line_routes_sheet);
    println!("Routes processed:   {}", outcome.routes);
    println!("Null removed:       {}", outcome.null_removed);
    println!("Duplicates removed: {}", outcome.duplicates_removed);
    println!("Output:             {}", outcome.output.display());
    Ok(())
}

pub fn output_summary_report(output_format: OutputFormat, report: &SummaryReport) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(report);
    }

    println!("\nHub Summary");
    println!("===========");
    println!("Files scanned:  {}", report.files_scanned);
    println!("Files skipped:  {}", report.files_skipped);
    println!("Hubs found:     {}", report.hubs_found);
    println!("Summaries:      {}", report.written.len());
    for path in &report.written {
        println!("  {}", path.display());
    }
    if !report.skipped_hubs.is_empty() {
        println!("Skipped hubs:   {}", report.skipped_hubs.join(", "));
    }
    if report.cancelled {
        println!("(cancelled before completion)");
    }
    Ok(())
}

pub fn output_analysis(output_format: OutputFormat, analysis: &SystemAnalysis) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(analysis);
    }

    println!("\nFleet Sizing");
    println!("============");
    if analysis.is_zero() {
        println!("No service required (zero demand, cycle time, headway or capacity)");
        return Ok(());
    }
    println!("Buses per group:    {}", analysis.buses_per_group);
    println!("Total trips:        {}", analysis.total_trips);
    println!("Groups per hour:    {}", analysis.groups_per_hour);
    println!("Unique groups:      {}", analysis.unique_groups);
    println!("Fleet size:         {}", analysis.fleet_size);
    println!("Hub area:           {:.0}", analysis.hub_area);
    println!("Capacity per hour:  {:.1}", analysis.capacity_per_hour);
    println!("Empty seats/hour:   {:.1}", analysis.empty_seats_per_hour);
    Ok(())
}

pub fn output_config(config: &Config) {
    println!("{}", config);
}
