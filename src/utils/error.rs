//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while reading a wide table or reducing its cells
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("CSV read failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input has no header row")]
    EmptyInput,

    #[error("Malformed number in column '{column}' at row {row}: '{value}'")]
    MalformedNumber {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Errors raised while building or compiling the family table
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid pattern for family '{family}': {source}")]
    InvalidPattern {
        family: String,
        #[source]
        source: regex::Error,
    },

    #[error("Pattern for family '{0}' has no capture groups")]
    NoCaptureGroups(String),

    #[error("Family '{family}' needs a value for {placeholder}")]
    UnresolvedPlaceholder { family: String, placeholder: String },

    #[error("Unknown family: {0}")]
    UnknownFamily(String),

    #[error("Family defined twice: {0}")]
    DuplicateFamily(String),

    #[error("Filter on family '{family}' targets key part {part}, pattern has {groups}")]
    FilterOutOfRange {
        family: String,
        part: usize,
        groups: usize,
    },

    #[error("Failed to parse family table: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read family table: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Invalid summary file: {0}")]
    InvalidSummary(String),
}
