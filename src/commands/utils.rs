use anyhow::{Context, Result};
use log::warn;
use std::path::Path;

use crate::aggregator::family::{FamilyTable, TemplateVars};
use crate::output::format_value;
use crate::parser::read_wide_file;
use crate::parser::schema::Summary;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::ConfigError;

/// Load the family table from JSON, or fall back to the built-in one
pub fn load_table(config: Option<&Path>) -> Result<FamilyTable> {
    match config {
        Some(path) => FamilyTable::from_file(path)
            .with_context(|| format!("Failed to load family table {}", path.display())),
        None => Ok(FamilyTable::builtin()),
    }
}

/// Show how many columns each family matches in a wide file
pub fn inspect_input(input: &Path, config: Option<&Path>, vars: &TemplateVars) -> Result<()> {
    let table = load_table(config)?;
    let wide = read_wide_file(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    println!("Inspecting: {}", input.display());
    println!("  Columns: {}", wide.headers.len());
    println!("  Rows:    {}", wide.row_count());
    println!();

    for def in &table.families {
        match def.compile(vars) {
            Ok(family) => {
                let matched = family.matched_columns(&wide.headers);
                println!("  {:<20} {:>5} matching columns", def.name, matched.len());
            }
            Err(ConfigError::UnresolvedPlaceholder { placeholder, .. }) => {
                println!("  {:<20} skipped (needs {})", def.name, placeholder);
            }
            Err(e) => {
                warn!("Family '{}' failed to compile: {}", def.name, e);
                println!("  {:<20} invalid", def.name);
            }
        }
    }

    Ok(())
}

/// Display the family table
pub fn display_families(show_details: bool, config: Option<&Path>) -> Result<()> {
    let table = load_table(config)?;

    println!("Bench Aggregator Families");
    println!();

    for def in &table.families {
        println!("  {:<20} {:<13} {}", def.name, def.reduction.kind(), def.description);
        if show_details {
            println!("    pattern: {}", def.pattern);
            if !def.key_columns.is_empty() {
                println!("    keys:    {}", def.key_columns.join(","));
            }
            if let Some(filter) = &def.filter {
                println!("    filter:  key part {} > {}", filter.part, filter.above);
            }
        }
    }

    if !show_details {
        println!();
        println!("Use --show for patterns and filters");
    }

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("Bench Aggregator v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Summarises wide benchmark CSV files into per-configuration statistics.");
}

/// Plain-text table of a summary, for `--summary`
pub fn text_summary(family: &str, summary: &Summary) -> String {
    let header = summary.header();
    let mut lines = vec![
        "=".repeat(60),
        format!("SUMMARY: {} ({} rows)", family, summary.rows.len()),
        "=".repeat(60),
        header
            .iter()
            .map(|h| format!("{:>14}", h))
            .collect::<String>(),
    ];

    for row in &summary.rows {
        let cells: String = row
            .key
            .parts()
            .iter()
            .map(|p| format!("{:>14}", p.to_string()))
            .chain(row.values.iter().map(|v| format!("{:>14}", format_value(*v))))
            .collect();
        lines.push(cells);
    }

    lines.join("\n")
}
