//! Summary CSV writer and reader.
//!
//! Layout: fixed header (key columns, then value columns), one row per
//! key in ascending order, floats with six decimals, integers plain.

use super::{ensure_parent_dir, file_size, validate_path};
use crate::parser::schema::{Key, KeyPart, Summary, SummaryRow};
use crate::utils::config::VALUE_PRECISION;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Render a value the way every summary file does
pub fn format_value(value: f64) -> String {
    format!("{:.*}", VALUE_PRECISION, value)
}

/// Write a summary as CSV to any writer
///
/// **Public** - used for stdout output and by `write_summary`
pub fn write_summary_to<W: Write>(summary: &Summary, writer: W) -> Result<(), OutputError> {
    let mut wtr = ::csv::Writer::from_writer(writer);

    wtr.write_record(summary.header())?;

    for row in &summary.rows {
        let record: Vec<String> = row
            .key
            .parts()
            .iter()
            .map(KeyPart::to_string)
            .chain(row.values.iter().map(|v| format_value(*v)))
            .collect();
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write a summary to a CSV file
///
/// **Public** - main entry point for CSV output
///
/// # Errors
/// * `OutputError::InvalidPath` - path is empty, a directory, or its
///   parent cannot be created
/// * `OutputError::WriteFailed` / `OutputError::Csv` - I/O error during write
pub fn write_summary(summary: &Summary, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing summary to: {}", output_path.display());

    validate_path(output_path)?;
    ensure_parent_dir(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    write_summary_to(summary, BufWriter::new(file))?;

    info!(
        "Summary written successfully ({} rows, {} bytes)",
        summary.rows.len(),
        file_size(output_path)
    );

    Ok(())
}

/// Read a summary CSV back
///
/// **Public** - useful for validation and re-aggregation
///
/// The first `key_width` columns are decoded as key parts, the rest as
/// values.
pub fn read_summary(input_path: impl AsRef<Path>, key_width: usize) -> Result<Summary, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading summary from: {}", input_path.display());

    let mut rdr = ::csv::Reader::from_path(input_path)?;
    let header: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    if key_width > header.len() {
        return Err(OutputError::InvalidSummary(format!(
            "{} has {} columns, expected at least {} key columns",
            input_path.display(),
            header.len(),
            key_width
        )));
    }

    let (keys, values) = header.split_at(key_width);
    let mut summary = Summary::new(keys.to_vec(), values.to_vec());

    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        let key = Key::new(record.iter().take(key_width).map(KeyPart::parse).collect());
        let values = record
            .iter()
            .skip(key_width)
            .map(|raw| {
                raw.trim().parse::<f64>().map_err(|_| {
                    OutputError::InvalidSummary(format!(
                        "{}: row {} has non-numeric value '{}'",
                        input_path.display(),
                        line + 1,
                        raw
                    ))
                })
            })
            .collect::<Result<Vec<f64>, OutputError>>()?;
        summary.rows.push(SummaryRow::new(key, values));
    }

    debug!("Summary loaded: {} rows", summary.rows.len());

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn sample_summary() -> Summary {
        let mut summary = Summary::new(
            vec!["input_num".to_string(), "block_num".to_string()],
            vec!["total".to_string()],
        );
        summary.rows.push(SummaryRow::new(
            Key::new(vec![KeyPart::Int(3), KeyPart::Int(10)]),
            vec![1.5],
        ));
        summary
    }

    #[test]
    fn test_write_to_buffer() {
        let mut buffer = Vec::new();
        write_summary_to(&sample_summary(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "input_num,block_num,total\n3,10,1.500000\n");
    }

    #[test]
    fn test_empty_summary_writes_header_only() {
        let summary = Summary::new(vec!["num_participants".to_string()], vec!["avg".to_string()]);
        let mut buffer = Vec::new();
        write_summary_to(&summary, &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "num_participants,avg\n");
    }

    #[test]
    fn test_write_and_read_summary() {
        let summary = sample_summary();
        let temp_file = NamedTempFile::new().unwrap();

        write_summary(&summary, temp_file.path()).unwrap();
        let loaded = read_summary(temp_file.path(), 2).unwrap();

        assert_eq!(loaded, summary);
    }

    #[test]
    fn test_read_summary_key_width_too_large() {
        let temp_file = NamedTempFile::new().unwrap();
        write_summary(&sample_summary(), temp_file.path()).unwrap();
        let result = read_summary(temp_file.path(), 5);
        assert!(matches!(result, Err(OutputError::InvalidSummary(_))));
    }

    #[test]
    fn test_read_summary_non_numeric_value() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "input_num,total\n1,fast\n").unwrap();
        let result = read_summary(temp_file.path(), 1);
        assert!(matches!(result, Err(OutputError::InvalidSummary(ref msg)) if msg.contains("fast")));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0.1), "0.100000");
        assert_eq!(format_value(2.0), "2.000000");
    }
}
