//! Aggregate command implementation.
//!
//! For every input and every requested family:
//! 1. Reads the wide table
//! 2. Resolves and compiles the family
//! 3. Runs the reduction
//! 4. Writes the summary CSV (file, directory or stdout)
//! 5. Optionally writes a JSON report and a text summary

use super::models::AggregateArgs;
use super::utils::{load_table, text_summary};
use crate::aggregator::aggregate;
use crate::output::{build_report, write_report, write_summary, write_summary_to};
use crate::parser::read_wide_file;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Execute the aggregate command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Unknown family or bad family table
/// * Malformed or missing cells in an input
/// * File write errors
pub fn execute_aggregate(args: AggregateArgs) -> Result<()> {
    let start_time = Instant::now();

    let table = load_table(args.config.as_deref())?;
    let vars = args.template_vars();

    for input in &args.inputs {
        info!("Reading input: {}", input.display());
        let wide = read_wide_file(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;

        debug!("Input has {} columns and {} rows", wide.headers.len(), wide.row_count());

        for name in &args.families {
            let family = table
                .resolve(name, args.local)
                .context("Failed to resolve family")?
                .compile(&vars)
                .with_context(|| format!("Failed to compile family '{}'", name))?;

            info!("Running family '{}' ({})", family.name(), family.reduction().kind());

            let matched = family.matched_columns(&wide.headers).len();
            let summary = aggregate(&wide, &family).with_context(|| {
                format!("Failed to aggregate '{}' over {}", family.name(), input.display())
            })?;

            info!("✓ {} rows from {} matched columns", summary.rows.len(), matched);

            match destination(&args, input, family.name()) {
                Some(path) => write_summary(&summary, &path)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => {
                    let stdout = std::io::stdout();
                    write_summary_to(&summary, stdout.lock())
                        .context("Failed to write summary to stdout")?;
                }
            }

            if args.print_summary {
                println!("\n{}", text_summary(family.name(), &summary));
            }

            if let Some(report_path) = &args.report {
                let report = build_report(&family, input, matched, wide.row_count(), summary);
                write_report(&report, report_path).context("Failed to write report JSON")?;
                info!("✓ Report written to: {}", report_path.display());
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!("Aggregation completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Where the CSV for one (input, family) pair goes; `None` means stdout
///
/// **Private** - internal helper for execute_aggregate
fn destination(args: &AggregateArgs, input: &Path, family: &str) -> Option<PathBuf> {
    if let Some(dir) = &args.out_dir {
        return Some(batch_output_path(dir, input, family));
    }
    args.output.clone()
}

/// `<dir>/<input_stem>_<family>.csv`
///
/// **Public** - naming scheme for batch outputs
pub fn batch_output_path(dir: &Path, input: &Path, family: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "summary".to_string());
    dir.join(format!("{}_{}.csv", stem, family))
}

/// Validate aggregate arguments
///
/// **Public** - can be called before execute_aggregate for early validation
pub fn validate_args(args: &AggregateArgs) -> Result<()> {
    if args.inputs.is_empty() {
        anyhow::bail!("At least one input file is required");
    }

    if args.families.is_empty() {
        anyhow::bail!("At least one family is required");
    }

    if args.output.is_some() && args.out_dir.is_some() {
        anyhow::bail!("--output and --out-dir cannot be used together");
    }

    if args.is_batch() && args.output.is_some() {
        anyhow::bail!("--output needs a single input and family; use --out-dir for batches");
    }

    if args.is_batch() && args.out_dir.is_none() {
        anyhow::bail!("Several inputs or families need --out-dir; stdout takes a single summary");
    }

    if args.is_batch() && args.report.is_some() {
        anyhow::bail!("--report needs a single input and family");
    }

    if let Some(txn) = &args.txn {
        if txn.is_empty() {
            anyhow::bail!("Transaction name cannot be empty");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single() -> AggregateArgs {
        AggregateArgs {
            inputs: vec![PathBuf::from("results.csv")],
            families: vec!["verify_kv".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_args_valid() {
        assert!(validate_args(&single()).is_ok());
    }

    #[test]
    fn test_validate_args_no_inputs() {
        let args = AggregateArgs {
            inputs: Vec::new(),
            ..single()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_no_families() {
        let args = AggregateArgs {
            families: Vec::new(),
            ..single()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_output_and_dir() {
        let args = AggregateArgs {
            output: Some(PathBuf::from("a.csv")),
            out_dir: Some(PathBuf::from("out")),
            ..single()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_batch_with_output() {
        let args = AggregateArgs {
            families: vec!["verify_kv".to_string(), "verify_opc".to_string()],
            output: Some(PathBuf::from("a.csv")),
            ..single()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_batch_to_stdout() {
        let args = AggregateArgs {
            families: vec!["verify_kv".to_string(), "verify_opc".to_string()],
            ..single()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_batch_with_out_dir() {
        let args = AggregateArgs {
            inputs: vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")],
            out_dir: Some(PathBuf::from("out")),
            ..single()
        };
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_batch_with_report() {
        let args = AggregateArgs {
            inputs: vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")],
            out_dir: Some(PathBuf::from("out")),
            report: Some(PathBuf::from("r.json")),
            ..single()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_empty_txn() {
        let args = AggregateArgs {
            txn: Some(String::new()),
            ..single()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_batch_output_path() {
        let path = batch_output_path(Path::new("out"), Path::new("data/run_1.csv"), "verify_kv");
        assert_eq!(path, PathBuf::from("out/run_1_verify_kv.csv"));
    }
}
