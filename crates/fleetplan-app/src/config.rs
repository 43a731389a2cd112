//! Configuration management for fleetplan
//!
//! Config stored at: ~/.config/fleetplan/config.json

use std::path::{Path, PathBuf};

use fleetplan_domain::service::{RouteAnalyzer, DEFAULT_AREA_PER_BUS, DEFAULT_DWELL_TIME};
use fleetplan_types::{ConfigError, OutputFormat, Result};
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Candidate bus capacities (seats per bus)
    #[serde(default = "default_bus_capacities")]
    pub bus_capacities: Vec<u32>,

    /// Candidate headways in minutes
    #[serde(default = "default_headways")]
    pub headways: Vec<u32>,

    /// Dwell time per stop in minutes
    #[serde(default = "default_dwell_time")]
    pub dwell_time: f64,

    /// Hub floor area needed per bus
    #[serde(default = "default_area_per_bus")]
    pub area_per_bus: f64,

    /// Hub names searched for in stop names, in priority order
    #[serde(default = "default_hub_patterns")]
    pub hub_patterns: Vec<String>,

    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,
}

fn default_bus_capacities() -> Vec<u32> {
    vec![25, 50]
}

fn default_headways() -> Vec<u32> {
    vec![10, 15, 20, 25, 30]
}

fn default_dwell_time() -> f64 {
    DEFAULT_DWELL_TIME
}

fn default_area_per_bus() -> f64 {
    DEFAULT_AREA_PER_BUS
}

fn default_hub_patterns() -> Vec<String> {
    ["Ext. Hub01", "Ext. Hub02", "Gate3"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bus_capacities: default_bus_capacities(),
            headways: default_headways(),
            dwell_time: default_dwell_time(),
            area_per_bus: default_area_per_bus(),
            hub_patterns: default_hub_patterns(),
            output_format: default_output_format(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("fleetplan");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load config from file, or create default.
    ///
    /// Values are not validated; planning commands call [`Config::validate`].
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the planner cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.bus_capacities.is_empty() || self.bus_capacities.contains(&0) {
            return Err(ConfigError::Invalid(
                "bus capacities must be a non-empty list of positive integers".to_string(),
            )
            .into());
        }
        if self.headways.is_empty() || self.headways.contains(&0) {
            return Err(ConfigError::Invalid(
                "headways must be a non-empty list of positive integers".to_string(),
            )
            .into());
        }
        if !(self.dwell_time.is_finite() && self.dwell_time >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "dwell time must be a non-negative number, got {}",
                self.dwell_time
            ))
            .into());
        }
        require_positive("area per bus", self.area_per_bus)?;
        Ok(())
    }

    /// Analyzer configured with this dwell time and area per bus
    pub fn analyzer(&self) -> RouteAnalyzer {
        RouteAnalyzer::new(self.dwell_time).with_area_per_bus(self.area_per_bus)
    }
}

/// Parse a comma-separated list of positive integers, e.g. `"25, 50"`
pub fn parse_list(text: &str) -> Result<Vec<u32>> {
    let values = text
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| match s.parse::<u32>() {
            Ok(v) if v > 0 => Ok(v),
            _ => Err(ConfigError::Invalid(format!(
                "'{}' is not a positive integer",
                s
            ))),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    if values.is_empty() {
        return Err(ConfigError::Invalid(format!("empty list: '{}'", text)).into());
    }
    Ok(values)
}

/// Reject zero, negative and non-finite values
pub fn require_positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Invalid(format!("{} must be positive, got {}", name, value)).into())
    }
}

/// Parse a dwell time in minutes
pub fn parse_dwell_time(text: &str) -> Result<f64> {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(ConfigError::Invalid(format!("'{}' is not a valid dwell time", text)).into()),
    }
}

fn join_list<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Fleetplan Configuration")?;
        writeln!(f, "=======================")?;
        writeln!(f)?;
        writeln!(f, "Bus capacities: {}", join_list(&self.bus_capacities))?;
        writeln!(f, "Headways (min): {}", join_list(&self.headways))?;
        writeln!(f, "Dwell time:     {} min", self.dwell_time)?;
        writeln!(f, "Area per bus:   {}", self.area_per_bus)?;
        writeln!(f, "Hub patterns:   {}", self.hub_patterns.join(", "))?;
        writeln!(f, "Output format:  {}", self.output_format)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:    {}", path.display())?;
        }

        Ok(())
    }
}
