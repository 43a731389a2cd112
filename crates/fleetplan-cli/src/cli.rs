//! CLI definition using clap

use clap::{Parser, Subcommand};
use fleetplan_types::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fleetplan")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Bus fleet sizing and operational plans for transit lines")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Per-run overrides of the planning parameters
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PlanningArgs {
    /// Bus capacities, comma separated (e.g. "25, 50")
    #[arg(long)]
    pub bus_capacities: Option<String>,

    /// Headways in minutes, comma separated (e.g. "10, 15, 20")
    #[arg(long)]
    pub headways: Option<String>,

    /// Dwell time per stop in minutes
    #[arg(long)]
    pub dwell_time: Option<String>,

    /// Hub area needed per bus
    #[arg(long)]
    pub area_per_bus: Option<f64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the stop-sequence table from a route model export
    MergeStops {
        /// Workbook with lineroute items and lineroutes sheets
        input: PathBuf,

        /// Output workbook (default: <input>_stop_sequences.xlsx)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Hub name to look for in stop names (repeatable, in priority order).
        /// Uses config patterns if not specified.
        #[arg(long = "hub-pattern")]
        hub_patterns: Vec<String>,
    },

    /// Show demand and cycle time of every line in a stop-sequence table
    Lines {
        /// Stop-sequence workbook
        input: PathBuf,

        #[command(flatten)]
        planning: PlanningArgs,
    },

    /// Generate one operational plan workbook per line
    Plan {
        /// Stop-sequence workbook
        input: PathBuf,

        /// Output folder; plans go to <output>/Operational_Plans
        #[arg(long, short = 'o', default_value = ".")]
        output: PathBuf,

        #[command(flatten)]
        planning: PlanningArgs,
    },

    /// Size a fleet for a single demand / cycle time / headway / capacity
    Size {
        /// Passengers per hour to carry
        #[arg(long)]
        demand: f64,

        /// Round-trip cycle time in minutes
        #[arg(long)]
        cycle_time: f64,

        /// Headway in minutes
        #[arg(long)]
        headway: f64,

        /// Seats per bus
        #[arg(long)]
        capacity: f64,

        /// Hub area needed per bus. Uses config value if not specified.
        #[arg(long)]
        area_per_bus: Option<f64>,
    },

    /// Combine hub areas of plan workbooks that share a hub
    SummarizeHubs {
        /// Folder with operational plan workbooks
        folder: PathBuf,

        /// Output folder for Summary_<hub>.xlsx files (default: the input folder)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set default bus capacities (e.g. "25, 50")
        #[arg(long)]
        set_bus_capacities: Option<String>,

        /// Set default headways (e.g. "10, 15, 20, 25, 30")
        #[arg(long)]
        set_headways: Option<String>,

        /// Set default dwell time per stop in minutes
        #[arg(long)]
        set_dwell_time: Option<String>,

        /// Set hub area per bus
        #[arg(long)]
        set_area_per_bus: Option<f64>,

        /// Set hub name patterns, comma separated
        #[arg(long)]
        set_hub_patterns: Option<String>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}
