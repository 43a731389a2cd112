//! Error types for fleetplan

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration value: {0}")]
    Invalid(String),
}

/// Worksheet layout errors (missing sheets or columns)
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Missing columns in {sheet}: {}", .columns.join(", "))]
    MissingColumns { sheet: String, columns: Vec<String> },

    #[error("No {role} column in {sheet} (tried: {})", .candidates.join(", "))]
    NoColumnMatch {
        sheet: String,
        role: String,
        candidates: Vec<String>,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Workbook read error: {0}")]
    Workbook(String),

    #[error("Excel export error: {0}")]
    Excel(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
