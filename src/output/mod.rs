//! Output writers for summaries and reports.
//!
//! This module handles writing data to disk in various formats:
//! - Summary CSV files (and any `io::Write`, for stdout)
//! - JSON run reports

pub mod csv;
pub mod json;

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

// Re-export main functions
pub use self::csv::{format_value, read_summary, write_summary, write_summary_to};
pub use self::json::{build_report, read_report, write_report};

/// Validate that an output path is writable
///
/// **Public** - shared by the CSV and JSON writers
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    // Check if we're trying to overwrite a directory
    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Create the parent directories of `path` if needed
///
/// **Private** - used by the writers before opening a file
fn ensure_parent_dir(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}

/// Size of a written file, 0 if it cannot be read
///
/// **Private** - internal utility
fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path_empty() {
        assert!(validate_path(Path::new("")).is_err());
    }

    #[test]
    fn test_validate_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(validate_path(temp_dir.path()).is_err());
    }

    #[test]
    fn test_validate_path_new_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(validate_path(&temp_dir.path().join("out.csv")).is_ok());
    }
}
