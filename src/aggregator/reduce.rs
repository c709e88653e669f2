//! Reductions from matched wide-table cells to sorted summary rows.
//!
//! Every reduction builds an ordered map keyed by `Key`, so output rows are
//! ascending by primary key, then secondary key, without a separate sort.
//! When two rows (or two columns) land on the same key the later one wins.

use super::family::{CompiledFamily, Reduction};
use super::stats::Stats;
use crate::parser::matcher::MatchedColumn;
use crate::parser::schema::{Key, KeyPart, Summary, SummaryRow};
use crate::parser::wide::{display_row, WideTable};
use crate::utils::config::INDEX_PLACEHOLDER;
use crate::utils::error::ParseError;
use log::{debug, warn};
use std::collections::BTreeMap;

/// Run a compiled family over a wide table
///
/// **Public** - main entry point for aggregation
///
/// # Returns
/// A summary with the family's header; no matching columns yields a
/// summary with no rows rather than an error.
///
/// # Errors
/// * `ParseError::MalformedNumber` - a required cell is not a number
/// * `ParseError::MissingField` - a required column or cell is absent
pub fn aggregate(table: &WideTable, family: &CompiledFamily) -> Result<Summary, ParseError> {
    let columns = family.matched_columns(&table.headers);
    let mut summary = Summary::new(family.key_columns(), family.value_columns());

    if columns.is_empty() {
        debug!("Family '{}' matched no columns", family.name());
        return Ok(summary);
    }

    summary.rows = match family.reduction() {
        Reduction::Pick { .. } => pick(table, &columns)?,
        Reduction::Participants {
            count_column,
            first_index,
            with_std,
            ..
        } => {
            let options = ParticipantOptions {
                count_column: count_column.as_deref(),
                first_index: *first_index,
                column_template: family.column_template.as_deref(),
                with_std: *with_std,
            };
            participant_stats(table, &columns, &options)?
        }
        Reduction::Columns { with_std } => column_stats(table, &columns, *with_std)?,
        Reduction::Sum { key_fields, .. } => sum_rows(table, &columns, key_fields)?,
    };

    debug!(
        "Family '{}' produced {} rows from {} columns",
        family.name(),
        summary.rows.len(),
        columns.len()
    );

    Ok(summary)
}

/// Take each matched cell of the first data row unchanged
pub fn pick(table: &WideTable, columns: &[MatchedColumn]) -> Result<Vec<SummaryRow>, ParseError> {
    if table.row_count() == 0 {
        return Ok(Vec::new());
    }

    let mut picked: BTreeMap<Key, f64> = BTreeMap::new();
    for col in columns {
        let value = table.number(0, col.index)?;
        picked.insert(col.key.clone(), value);
    }

    Ok(picked
        .into_iter()
        .map(|(key, value)| SummaryRow::new(key, vec![value]))
        .collect())
}

/// Settings for `participant_stats`
#[derive(Debug, Clone, Default)]
pub struct ParticipantOptions<'a> {
    pub count_column: Option<&'a str>,
    pub first_index: i64,
    pub column_template: Option<&'a str>,
    pub with_std: bool,
}

impl ParticipantOptions<'_> {
    fn expected_label(&self, index: i64) -> String {
        match self.column_template {
            Some(template) => template.replace(INDEX_PLACEHOLDER, &index.to_string()),
            None => format!("participant {}", index),
        }
    }
}

/// Pool one value per participant and reduce per participant count
///
/// The first key part of each matched column is the participant index.
pub fn participant_stats(
    table: &WideTable,
    columns: &[MatchedColumn],
    options: &ParticipantOptions<'_>,
) -> Result<Vec<SummaryRow>, ParseError> {
    let mut by_index: BTreeMap<i64, usize> = BTreeMap::new();
    for col in columns {
        match col.key.get(0).and_then(KeyPart::as_int) {
            Some(index) => {
                if let Some(previous) = by_index.insert(index, col.index) {
                    debug!(
                        "Participant {} seen again in '{}': replaces column {}",
                        index, col.label, previous
                    );
                }
            }
            None => warn!("Column '{}' has no numeric participant index, skipping", col.label),
        }
    }

    let count_index = match options.count_column {
        Some(name) => Some(
            table
                .column_index(name)
                .ok_or_else(|| ParseError::MissingField(name.to_string()))?,
        ),
        None => None,
    };

    let mut pooled: BTreeMap<i64, Vec<f64>> = BTreeMap::new();

    for row in 0..table.row_count() {
        let values = match count_index {
            Some(count_col) => {
                let count = participant_count(table, row, count_col)?;
                let end = options.first_index.checked_add(count).ok_or_else(|| {
                    ParseError::MalformedNumber {
                        column: table.headers[count_col].clone(),
                        row: display_row(row),
                        value: count.to_string(),
                    }
                })?;
                // Capacity is bounded by the columns that actually exist
                let mut values = Vec::with_capacity(by_index.len());
                for index in options.first_index..end {
                    let column = by_index
                        .get(&index)
                        .ok_or_else(|| ParseError::MissingField(options.expected_label(index)))?;
                    if table.cell(row, *column).is_none() {
                        return Err(ParseError::MissingField(options.expected_label(index)));
                    }
                    values.push(table.number(row, *column)?);
                }
                values
            }
            None => {
                let mut values = Vec::new();
                for column in by_index.values() {
                    if let Some(value) = table.optional_number(row, *column)? {
                        values.push(value);
                    }
                }
                values
            }
        };

        if values.is_empty() {
            debug!("Row {} has no participant values", display_row(row));
            continue;
        }

        pooled
            .entry(values.len() as i64)
            .or_default()
            .extend(values);
    }

    Ok(pooled
        .into_iter()
        .filter_map(|(count, values)| {
            Stats::from_values(&values).map(|stats| {
                debug!("{} participants: {}", count, stats.summary());
                SummaryRow::new(Key::new(vec![KeyPart::Int(count)]), stats.to_values(options.with_std))
            })
        })
        .collect())
}

fn participant_count(table: &WideTable, row: usize, column: usize) -> Result<i64, ParseError> {
    let raw = table.required_cell(row, column)?;
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|n| *n >= 0)
        .ok_or_else(|| ParseError::MalformedNumber {
            column: table.headers[column].clone(),
            row: display_row(row),
            value: raw.to_string(),
        })
}

/// Reduce every matched column across all rows
///
/// Output values are `count, avg, min, max[, std]`. Blank cells are skipped.
pub fn column_stats(
    table: &WideTable,
    columns: &[MatchedColumn],
    with_std: bool,
) -> Result<Vec<SummaryRow>, ParseError> {
    let mut gathered: BTreeMap<Key, Vec<f64>> = BTreeMap::new();

    for col in columns {
        let mut values = Vec::with_capacity(table.row_count());
        for row in 0..table.row_count() {
            if let Some(value) = table.optional_number(row, col.index)? {
                values.push(value);
            }
        }
        gathered.insert(col.key.clone(), values);
    }

    Ok(gathered
        .into_iter()
        .filter_map(|(key, values)| {
            Stats::from_values(&values).map(|stats| {
                let mut row = vec![stats.count as f64];
                row.extend(stats.to_values(with_std));
                SummaryRow::new(key, row)
            })
        })
        .collect())
}

/// Sum matched cells per row
///
/// The row key comes from the `key_fields` cells, or the 1-based trial
/// number when there are none. Duplicate keys keep the last row.
pub fn sum_rows(
    table: &WideTable,
    columns: &[MatchedColumn],
    key_fields: &[String],
) -> Result<Vec<SummaryRow>, ParseError> {
    let key_indexes = key_fields
        .iter()
        .map(|field| {
            table
                .column_index(field)
                .ok_or_else(|| ParseError::MissingField(field.clone()))
        })
        .collect::<Result<Vec<usize>, ParseError>>()?;

    let mut totals: BTreeMap<Key, f64> = BTreeMap::new();

    for row in 0..table.row_count() {
        let key = if key_indexes.is_empty() {
            Key::new(vec![KeyPart::Int(display_row(row) as i64)])
        } else {
            let parts = key_indexes
                .iter()
                .map(|&column| table.required_cell(row, column).map(KeyPart::parse))
                .collect::<Result<Vec<KeyPart>, ParseError>>()?;
            Key::new(parts)
        };

        let mut total = 0.0;
        for col in columns {
            total += table.number(row, col.index)?;
        }

        if let Some(previous) = totals.insert(key.clone(), total) {
            debug!(
                "Key {} seen again at row {}: {:.6} replaces {:.6}",
                key,
                display_row(row),
                total,
                previous
            );
        }
    }

    Ok(totals
        .into_iter()
        .map(|(key, total)| SummaryRow::new(key, vec![total]))
        .collect())
}
