//! Data model shared by the matcher, the reductions and the writers.
//!
//! A `Key` is decoded from a column label (or from data cells for
//! summation) and orders summary rows. The JSON report schema is versioned
//! to allow future evolution.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// One part of an aggregation key
///
/// Captures that parse as `i64` become `Int` so that `10` sorts after `2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyPart {
    Int(i64),
    Text(String),
}

impl KeyPart {
    /// Decode a raw capture or cell, preferring an integer reading
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => KeyPart::Int(n),
            Err(_) => KeyPart::Text(trimmed.to_string()),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            KeyPart::Int(n) => Some(*n),
            KeyPart::Text(_) => None,
        }
    }
}

impl Ord for KeyPart {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (KeyPart::Int(a), KeyPart::Int(b)) => a.cmp(b),
            (KeyPart::Text(a), KeyPart::Text(b)) => a.cmp(b),
            // Integers sort ahead of text
            (KeyPart::Int(_), KeyPart::Text(_)) => Ordering::Less,
            (KeyPart::Text(_), KeyPart::Int(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for KeyPart {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Int(n) => write!(f, "{}", n),
            KeyPart::Text(s) => f.write_str(s),
        }
    }
}

/// Ordered tuple of key parts
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(pub Vec<KeyPart>);

impl Key {
    pub fn new(parts: Vec<KeyPart>) -> Self {
        Self(parts)
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&KeyPart> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<KeyPart>> for Key {
    fn from(parts: Vec<KeyPart>) -> Self {
        Self(parts)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(|p| p.to_string()).collect();
        write!(f, "({})", rendered.join(", "))
    }
}

/// One output row: key followed by its statistic values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub key: Key,
    pub values: Vec<f64>,
}

impl SummaryRow {
    pub fn new(key: Key, values: Vec<f64>) -> Self {
        Self { key, values }
    }
}

/// Long-format result of one reduction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Header names for the key parts
    pub key_columns: Vec<String>,

    /// Header names for the statistic values
    pub value_columns: Vec<String>,

    /// Rows, ascending by key
    pub rows: Vec<SummaryRow>,
}

impl Summary {
    pub fn new(key_columns: Vec<String>, value_columns: Vec<String>) -> Self {
        Self {
            key_columns,
            value_columns,
            rows: Vec::new(),
        }
    }

    /// Full CSV header: key columns then value columns
    pub fn header(&self) -> Vec<String> {
        self.key_columns
            .iter()
            .chain(self.value_columns.iter())
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up the row for a key (linear; summaries are small)
    pub fn row(&self, key: &Key) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| &r.key == key)
    }
}

/// JSON report written next to a summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Family that produced the summary
    pub family: String,

    /// Input file the family ran on
    pub input: String,

    /// Reduction kind (pick, participants, columns, sum)
    pub reduction: String,

    /// Number of header columns the family pattern matched
    pub matched_columns: usize,

    /// Number of data rows in the input
    pub input_rows: usize,

    /// The summary itself
    pub summary: Summary,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_part_parse() {
        assert_eq!(KeyPart::parse("42"), KeyPart::Int(42));
        assert_eq!(KeyPart::parse(" 7 "), KeyPart::Int(7));
        assert_eq!(KeyPart::parse("exec"), KeyPart::Text("exec".to_string()));
    }

    #[test]
    fn test_key_orders_numerically() {
        let a = Key::new(vec![KeyPart::Int(3), KeyPart::Int(2)]);
        let b = Key::new(vec![KeyPart::Int(3), KeyPart::Int(10)]);
        let c = Key::new(vec![KeyPart::Int(4), KeyPart::Int(1)]);
        let mut keys = vec![c.clone(), b.clone(), a.clone()];
        keys.sort();
        assert_eq!(keys, vec![a, b, c]);
    }

    #[test]
    fn test_int_sorts_before_text() {
        assert!(KeyPart::Int(100) < KeyPart::Text("a".to_string()));
    }

    #[test]
    fn test_summary_header() {
        let summary = Summary::new(
            vec!["input_num".to_string(), "block_num".to_string()],
            vec!["total".to_string()],
        );
        assert_eq!(summary.header(), vec!["input_num", "block_num", "total"]);
        assert!(summary.is_empty());
    }
}
