use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the caseload reporting engine.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A collaborator export file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON export could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A date string did not match any recognised ISO-8601 form.
    #[error("Invalid date format: {0}")]
    DateParse(String),

    /// A granularity name is not one of year / quarter / month / day.
    #[error("Unknown granularity: {0}")]
    UnknownGranularity(String),

    /// The expected data directory does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// No JSON export files were found under the given directory.
    #[error("No JSON export files found in {0}")]
    NoDataFiles(PathBuf),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the caseload crates.
pub type Result<T> = std::result::Result<T, ReportError>;
