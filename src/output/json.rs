//! JSON report writer.
//!
//! Writes an `AggregationReport` (the summary plus run metadata) with
//! proper formatting.

use super::{ensure_parent_dir, file_size, validate_path};
use crate::aggregator::family::CompiledFamily;
use crate::parser::schema::{AggregationReport, Summary};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Assemble a report for one family run
///
/// **Public** - used by commands to create the final report
pub fn build_report(
    family: &CompiledFamily,
    input: &Path,
    matched_columns: usize,
    input_rows: usize,
    summary: Summary,
) -> AggregationReport {
    AggregationReport {
        version: SCHEMA_VERSION.to_string(),
        family: family.name().to_string(),
        input: input.display().to_string(),
        reduction: family.reduction().kind().to_string(),
        matched_columns,
        input_rows,
        summary,
        generated_at: Utc::now().to_rfc3339(),
    }
}

/// Write a report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let report = build_report(&family, &input, matched, rows, summary);
/// write_report(&report, "report.json")?;
/// ```
pub fn write_report(report: &AggregationReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    validate_path(output_path)?;
    ensure_parent_dir(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, report).map_err(OutputError::SerializationFailed)?;

    info!("Report written successfully ({} bytes)", file_size(output_path));

    Ok(())
}

/// Read a report from a JSON file
///
/// **Public** - useful for validation and testing
pub fn read_report(input_path: impl AsRef<Path>) -> Result<AggregationReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let report: AggregationReport =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!("Report loaded: version {}, family {}", report.version, report.family);

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::{Key, KeyPart, SummaryRow};
    use tempfile::NamedTempFile;

    fn create_test_report() -> AggregationReport {
        let mut summary = Summary::new(vec!["num_participants".to_string()], vec!["avg".to_string()]);
        summary
            .rows
            .push(SummaryRow::new(Key::new(vec![KeyPart::Int(4)]), vec![0.25]));

        AggregationReport {
            version: "1.0.0".to_string(),
            family: "participants".to_string(),
            input: "results.csv".to_string(),
            reduction: "participants".to_string(),
            matched_columns: 4,
            input_rows: 1,
            summary,
            generated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_write_and_read_report() {
        let report = create_test_report();
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        write_report(&report, path).unwrap();
        let loaded = read_report(path).unwrap();

        assert_eq!(loaded.family, report.family);
        assert_eq!(loaded.matched_columns, 4);
        assert_eq!(loaded.summary, report.summary);
    }

    #[test]
    fn test_report_field_names() {
        let json = serde_json::to_string(&create_test_report()).unwrap();
        for field in ["\"matched_columns\"", "\"input_rows\"", "\"summary\"", "\"generated_at\""] {
            assert!(json.contains(field), "missing {}", field);
        }
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/report.json");

        write_report(&create_test_report(), &nested_path).unwrap();

        assert!(nested_path.exists());
    }
}
