//! Wide table parsing and schema definitions.
//!
//! This module handles:
//! - Reading wide CSV files into memory
//! - Matching column labels against family patterns
//! - Defining the summary and report schema

pub mod matcher;
pub mod schema;
pub mod wide;

// Re-export main types
pub use matcher::{LabelMatcher, MatchedColumn};
pub use schema::{AggregationReport, Key, KeyPart, Summary, SummaryRow};
pub use wide::{read_wide, read_wide_file, WideTable};
