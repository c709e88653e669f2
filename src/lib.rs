//! Bench Aggregator
//!
//! Summarises wide benchmark CSV files (one row per trial, one column per
//! metric and parameter combination) into long-format summary CSV files.
//!
//! Parameters are decoded from the column headers by a table of metric
//! families; each family names a label pattern and a reduction (pick,
//! participant statistics, per-column statistics, or summation).
//!
//! ## Getting Started
//!
//! ```bash
//! bench-agg aggregate results.csv --family verify_kv
//! bench-agg aggregate results.csv --family participants --txn vote
//! bench-agg families --show
//! ```
//!
//! As a library:
//!
//! ```ignore
//! use bench_aggregator::aggregator::{aggregate, FamilyTable, TemplateVars};
//! use bench_aggregator::parser::read_wide_file;
//!
//! let table = FamilyTable::builtin();
//! let family = table.resolve("verify_kv", false)?.compile(&TemplateVars::default())?;
//! let summary = aggregate(&read_wide_file("results.csv")?, &family)?;
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
