//! Aggregation of wide tables into long-format summaries.
//!
//! This module holds:
//! - The family table (pattern + reduction per metric)
//! - Summary statistics
//! - The reductions themselves

pub mod family;
pub mod reduce;
pub mod stats;

// Re-export main types and functions
pub use family::{CompiledFamily, FamilyDef, FamilyTable, KeyFilter, Reduction, TemplateVars};
pub use reduce::{aggregate, column_stats, participant_stats, pick, sum_rows, ParticipantOptions};
pub use stats::Stats;
