//! Command handlers

use crate::cli::{Cli, Commands, PlanningArgs};
use crate::output::{
    output_analysis, output_config, output_line_previews, output_merge, output_plan_report,
    output_summary_report,
};
use fleetplan_app::app::{
    default_merge_output, generate_plans, load_line_previews, merge_stop_sequences,
    spawn_summary, CancellationToken, SummaryEvent,
};
use fleetplan_app::config::{parse_dwell_time, parse_list, require_positive, Config};
use fleetplan_domain::service::size_fleet_with_area;
use fleetplan_types::{ConfigError, Error, OutputFormat, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    // Reset must work even when the config file cannot be parsed
    if let Commands::Config { reset: true, .. } = cli.command {
        return cmd_reset_config();
    }

    let config = Config::load()?;
    let output_format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::MergeStops {
            input,
            output,
            hub_patterns,
        } => {
            let patterns = if hub_patterns.is_empty() {
                config.hub_patterns.clone()
            } else {
                hub_patterns
            };
            cmd_merge_stops(input, output, &patterns, output_format)
        }

        Commands::Lines { input, planning } => {
            let config = apply_planning_args(config, &planning)?;
            cmd_lines(input, &config, output_format)
        }

        Commands::Plan {
            input,
            output,
            planning,
        } => {
            let config = apply_planning_args(config, &planning)?;
            cmd_plan(input, output, &config, output_format)
        }

        Commands::Size {
            demand,
            cycle_time,
            headway,
            capacity,
            area_per_bus,
        } => {
            let headway = require_positive("headway", headway)?;
            let capacity = require_positive("bus capacity", capacity)?;
            let area = require_positive("area per bus", area_per_bus.unwrap_or(config.area_per_bus))?;
            let analysis = size_fleet_with_area(demand, cycle_time, headway, capacity, area);
            output_analysis(output_format, &analysis)
        }

        Commands::SummarizeHubs { folder, output } => {
            let output = output.unwrap_or_else(|| folder.clone());
            cmd_summarize_hubs(folder, output, output_format)
        }

        Commands::Config {
            show,
            set_bus_capacities,
            set_headways,
            set_dwell_time,
            set_area_per_bus,
            set_hub_patterns,
            set_output,
            reset,
        } => cmd_config(
            show,
            set_bus_capacities,
            set_headways,
            set_dwell_time,
            set_area_per_bus,
            set_hub_patterns,
            set_output,
            reset,
        ),
    }
}

/// Override config values for this run only
fn apply_planning_args(mut config: Config, args: &PlanningArgs) -> Result<Config> {
    if let Some(ref text) = args.bus_capacities {
        config.bus_capacities = parse_list(text)?;
    }
    if let Some(ref text) = args.headways {
        config.headways = parse_list(text)?;
    }
    if let Some(ref text) = args.dwell_time {
        config.dwell_time = parse_dwell_time(text)?;
    }
    if let Some(area) = args.area_per_bus {
        config.area_per_bus = area;
    }
    config.validate()?;
    Ok(config)
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn cmd_merge_stops(
    input: PathBuf,
    output: Option<PathBuf>,
    hub_patterns: &[String],
    output_format: OutputFormat,
) -> Result<()> {
    let output = output.unwrap_or_else(|| default_merge_output(&input));
    let pb = spinner("Merging stop sequences...");
    let outcome = merge_stop_sequences(&input, &output, hub_patterns);
    pb.finish_and_clear();
    output_merge(output_format, &outcome?)
}

fn cmd_lines(input: PathBuf, config: &Config, output_format: OutputFormat) -> Result<()> {
    let previews = load_line_previews(&input, &config.analyzer())?;
    if previews.is_empty() {
        return Err(Error::InvalidInput(format!(
            "no lines found in {}",
            input.display()
        )));
    }
    output_line_previews(output_format, &previews)
}

fn cmd_plan(
    input: PathBuf,
    output: PathBuf,
    config: &Config,
    output_format: OutputFormat,
) -> Result<()> {
    let pb = spinner("Generating operational plans...");
    let mut count = 0usize;
    let report = generate_plans(&input, &output, config, |plan| {
        count += 1;
        pb.set_message(format!("{} plans written ({})", count, plan.line_name));
    });
    pb.finish_and_clear();
    output_plan_report(output_format, &report?)
}

fn cmd_summarize_hubs(folder: PathBuf, output: PathBuf, output_format: OutputFormat) -> Result<()> {
    let cancel = CancellationToken::new();
    let (events, handle) = spawn_summary(folder, output, cancel);

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let mut outcome = None;
    for event in events {
        match event {
            SummaryEvent::Scanned { files } => {
                pb.set_length(files as u64);
                pb.set_message("reading plan files");
            }
            SummaryEvent::FileRead { path, .. } | SummaryEvent::FileSkipped { path, .. } => {
                pb.inc(1);
                pb.set_message(
                    path.file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or_default()
                        .to_string(),
                );
            }
            SummaryEvent::HubsFound { total, .. } => {
                pb.set_position(0);
                pb.set_length(total as u64);
                pb.set_message("combining hubs");
            }
            SummaryEvent::HubWritten { hub, .. } | SummaryEvent::HubSkipped { hub, .. } => {
                pb.inc(1);
                pb.set_message(hub);
            }
            SummaryEvent::Finished(report) => outcome = Some(Ok(report)),
            SummaryEvent::Failed(message) => outcome = Some(Err(message)),
        }
    }
    pb.finish_and_clear();

    if handle.join().is_err() {
        return Err(Error::InvalidInput("hub summary worker panicked".to_string()));
    }

    match outcome {
        Some(Ok(report)) => output_summary_report(output_format, &report),
        Some(Err(message)) => Err(Error::InvalidInput(message)),
        None => Err(Error::InvalidInput(
            "hub summary worker ended without a result".to_string(),
        )),
    }
}

fn cmd_reset_config() -> Result<()> {
    let config = Config::default();
    config.save()?;
    println!("Configuration reset to defaults");
    println!("\n{}", config);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_config(
    show: bool,
    set_bus_capacities: Option<String>,
    set_headways: Option<String>,
    set_dwell_time: Option<String>,
    set_area_per_bus: Option<f64>,
    set_hub_patterns: Option<String>,
    set_output: Option<OutputFormat>,
    reset: bool,
) -> Result<()> {
    if reset {
        return cmd_reset_config();
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(text) = set_bus_capacities {
        config.bus_capacities = parse_list(&text)?;
        modified = true;
    }

    if let Some(text) = set_headways {
        config.headways = parse_list(&text)?;
        modified = true;
    }

    if let Some(text) = set_dwell_time {
        config.dwell_time = parse_dwell_time(&text)?;
        modified = true;
    }

    if let Some(area) = set_area_per_bus {
        config.area_per_bus = area;
        modified = true;
    }

    if let Some(text) = set_hub_patterns {
        let patterns: Vec<String> = text
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if patterns.is_empty() {
            return Err(ConfigError::Invalid("hub patterns must not be empty".to_string()).into());
        }
        config.hub_patterns = patterns;
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration saved");
    }

    if show || !modified {
        output_config(&config);
    }

    Ok(())
}
