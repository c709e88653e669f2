//! Family table: which columns belong to which metric, and how to reduce them.
//!
//! A family ties a name to a label pattern and a reduction. Tables are
//! plain values passed into the engine; the built-in table covers the
//! experiment outputs we post-process, and a JSON file can replace it.
//!
//! Patterns may contain `{txn}` and `{stat}` placeholders that are filled
//! (regex-escaped) from `TemplateVars` when the family is compiled.

use crate::parser::matcher::{LabelMatcher, MatchedColumn};
use crate::parser::schema::Key;
use crate::utils::config::{
    COUNT_COLUMN, DEFAULT_STAT, LOCAL_SUFFIX, PARTICIPANT_COUNT_COLUMN, STAT_PLACEHOLDER,
    STATS_COLUMNS, STD_COLUMN, TOTAL_COLUMN, TXN_PLACEHOLDER,
};
use crate::utils::error::ConfigError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

/// How matched cells are folded into summary rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reduction {
    /// Take each matched cell of the first data row as-is
    Pick {
        #[serde(default = "default_total")]
        value_column: String,
    },

    /// Pool one value per participant, grouped by participant count
    Participants {
        /// Data column holding the participant count of each row
        #[serde(default)]
        count_column: Option<String>,

        /// Index of the first participant when `count_column` is set
        #[serde(default)]
        first_index: i64,

        /// Label of a participant column, with an `{index}` placeholder
        #[serde(default)]
        column_template: Option<String>,

        #[serde(default = "default_true")]
        with_std: bool,
    },

    /// Reduce every matched column across all rows
    Columns {
        #[serde(default = "default_true")]
        with_std: bool,
    },

    /// Sum matched cells per row, keyed by data cells, last row wins
    Sum {
        #[serde(default)]
        key_fields: Vec<String>,

        /// Labels containing any of these substrings are left out
        #[serde(default)]
        exclude: Vec<String>,

        #[serde(default = "default_total")]
        value_column: String,
    },
}

fn default_total() -> String {
    TOTAL_COLUMN.to_string()
}

fn default_true() -> bool {
    true
}

impl Reduction {
    pub fn kind(&self) -> &'static str {
        match self {
            Reduction::Pick { .. } => "pick",
            Reduction::Participants { .. } => "participants",
            Reduction::Columns { .. } => "columns",
            Reduction::Sum { .. } => "sum",
        }
    }
}

/// Keep only keys whose integer part at `part` is strictly above `above`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFilter {
    pub part: usize,
    pub above: i64,
}

impl KeyFilter {
    pub fn retains(&self, key: &Key) -> bool {
        key.get(self.part)
            .and_then(|p| p.as_int())
            .map(|n| n > self.above)
            .unwrap_or(false)
    }
}

/// Declarative definition of one metric family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyDef {
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub pattern: String,

    /// Output names for the decoded key parts (pick and columns)
    #[serde(default)]
    pub key_columns: Vec<String>,

    #[serde(default)]
    pub filter: Option<KeyFilter>,

    pub reduction: Reduction,
}

/// Values substituted into pattern placeholders
#[derive(Debug, Clone, Default)]
pub struct TemplateVars {
    pub txn: Option<String>,
    pub stat: Option<String>,
}

impl TemplateVars {
    pub fn new(txn: Option<String>, stat: Option<String>) -> Self {
        Self { txn, stat }
    }

    /// Replace placeholders in `template`; `escape` quotes values for regex use
    pub fn render(&self, family: &str, template: &str, escape: bool) -> Result<String, ConfigError> {
        let stat = self.stat.as_deref().unwrap_or(DEFAULT_STAT);
        let mut rendered = template.to_string();

        for (placeholder, value) in [(TXN_PLACEHOLDER, self.txn.as_deref()), (STAT_PLACEHOLDER, Some(stat))] {
            if !rendered.contains(placeholder) {
                continue;
            }
            let value = value.ok_or_else(|| ConfigError::UnresolvedPlaceholder {
                family: family.to_string(),
                placeholder: placeholder.to_string(),
            })?;
            let value = if escape {
                regex::escape(value)
            } else {
                value.to_string()
            };
            rendered = rendered.replace(placeholder, &value);
        }

        Ok(rendered)
    }
}

/// A family whose pattern has been rendered and compiled
#[derive(Debug, Clone)]
pub struct CompiledFamily {
    pub def: FamilyDef,
    pub matcher: LabelMatcher,

    /// Rendered participant label template (still holds `{index}`)
    pub column_template: Option<String>,
}

impl CompiledFamily {
    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn reduction(&self) -> &Reduction {
        &self.def.reduction
    }

    /// Matched header columns that pass the key filter
    pub fn matched_columns(&self, headers: &[String]) -> Vec<MatchedColumn> {
        let mut matched = self.matcher.matching_columns(headers);

        if let Some(filter) = &self.def.filter {
            let before = matched.len();
            matched.retain(|col| filter.retains(&col.key));
            debug!(
                "Family '{}' filter kept {} of {} columns (part {} > {})",
                self.def.name,
                matched.len(),
                before,
                filter.part,
                filter.above
            );
        }

        if let Reduction::Sum { exclude, .. } = &self.def.reduction {
            matched.retain(|col| !exclude.iter().any(|ex| col.label.contains(ex.as_str())));
        }

        matched
    }

    /// Output header names for the key parts
    pub fn key_columns(&self) -> Vec<String> {
        match &self.def.reduction {
            Reduction::Participants { .. } => vec![PARTICIPANT_COUNT_COLUMN.to_string()],
            Reduction::Sum { key_fields, .. } if !key_fields.is_empty() => key_fields.clone(),
            Reduction::Sum { .. } => vec!["trial".to_string()],
            Reduction::Pick { .. } | Reduction::Columns { .. } => (0..self.matcher.groups())
                .map(|i| {
                    self.def
                        .key_columns
                        .get(i)
                        .cloned()
                        .unwrap_or_else(|| format!("key{}", i + 1))
                })
                .collect(),
        }
    }

    /// Output header names for the values
    pub fn value_columns(&self) -> Vec<String> {
        let stats_columns = |with_std: bool| {
            let mut cols: Vec<String> = STATS_COLUMNS.iter().map(|s| s.to_string()).collect();
            if with_std {
                cols.push(STD_COLUMN.to_string());
            }
            cols
        };

        match &self.def.reduction {
            Reduction::Pick { value_column } | Reduction::Sum { value_column, .. } => {
                vec![value_column.clone()]
            }
            Reduction::Participants { with_std, .. } => stats_columns(*with_std),
            Reduction::Columns { with_std } => {
                let mut cols = vec![COUNT_COLUMN.to_string()];
                cols.extend(stats_columns(*with_std));
                cols
            }
        }
    }
}

impl FamilyDef {
    /// Render placeholders and compile the pattern
    pub fn compile(&self, vars: &TemplateVars) -> Result<CompiledFamily, ConfigError> {
        let pattern = vars.render(&self.name, &self.pattern, true)?;
        let matcher = LabelMatcher::new(&self.name, &pattern)?;

        if let Some(filter) = &self.filter {
            if filter.part >= matcher.groups() {
                return Err(ConfigError::FilterOutOfRange {
                    family: self.name.clone(),
                    part: filter.part,
                    groups: matcher.groups(),
                });
            }
        }

        let column_template = match &self.reduction {
            Reduction::Participants {
                column_template: Some(template),
                ..
            } => Some(vars.render(&self.name, template, false)?),
            _ => None,
        };

        debug!("Compiled family '{}': {}", self.name, pattern);

        Ok(CompiledFamily {
            def: self.clone(),
            matcher,
            column_template,
        })
    }

    /// Whether the pattern needs a transaction name
    pub fn needs_txn(&self) -> bool {
        self.pattern.contains(TXN_PLACEHOLDER)
    }
}

/// Ordered set of family definitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyTable {
    pub families: Vec<FamilyDef>,
}

impl FamilyTable {
    /// Build a table, rejecting duplicate names
    pub fn new(families: Vec<FamilyDef>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for family in &families {
            if !seen.insert(family.name.as_str()) {
                return Err(ConfigError::DuplicateFamily(family.name.clone()));
            }
        }
        Ok(Self { families })
    }

    /// Parse a table from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let table: FamilyTable = serde_json::from_str(json)?;
        Self::new(table.families)
    }

    /// Load a table from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Loading family table from: {}", path.display());
        let file = File::open(path)?;
        let table: FamilyTable = serde_json::from_reader(file)?;
        Self::new(table.families)
    }

    pub fn get(&self, name: &str) -> Option<&FamilyDef> {
        self.families.iter().find(|f| f.name == name)
    }

    /// Look up a family, preferring its local variant when `local` is set
    pub fn resolve(&self, name: &str, local: bool) -> Result<&FamilyDef, ConfigError> {
        if local {
            let local_name = format!("{}{}", name, LOCAL_SUFFIX);
            if let Some(family) = self.get(&local_name) {
                return Ok(family);
            }
            debug!("No local variant '{}', using '{}'", local_name, name);
        }
        self.get(name)
            .ok_or_else(|| ConfigError::UnknownFamily(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.families.iter().map(|f| f.name.as_str()).collect()
    }

    /// The families shipped with the tool
    pub fn builtin() -> Self {
        let verify = |name: &str, prefix: &str, second: &str, above: i64, description: &str| FamilyDef {
            name: name.to_string(),
            description: description.to_string(),
            pattern: format!(r"^{}_(\d+)_(\d+)_wall_avg$", prefix),
            key_columns: vec!["input_num".to_string(), second.to_string()],
            filter: Some(KeyFilter { part: 1, above }),
            reduction: Reduction::Pick {
                value_column: TOTAL_COLUMN.to_string(),
            },
        };

        let participant_pattern = format!(r"^p(\d+)_{}_wall_{}$", TXN_PLACEHOLDER, STAT_PLACEHOLDER);

        Self {
            families: vec![
                verify("verify_kv", "verify", "block_num", 5, "Key-value verification time per block count"),
                verify("verify_kv_local", "verify_local", "block_num", 5, "Local key-value verification time per block count"),
                verify("verify_opc", "verify", "data_size", 4096, "Opcode verification time per data size"),
                verify("verify_opc_local", "verify_local", "data_size", 4096, "Local opcode verification time per data size"),
                FamilyDef {
                    name: "participants".to_string(),
                    description: "Per-participant wall time grouped by participant count".to_string(),
                    pattern: participant_pattern.clone(),
                    key_columns: Vec::new(),
                    filter: None,
                    reduction: Reduction::Participants {
                        count_column: None,
                        first_index: 0,
                        column_template: Some(format!(
                            "p{{index}}_{}_wall_{}",
                            TXN_PLACEHOLDER, STAT_PLACEHOLDER
                        )),
                        with_std: true,
                    },
                },
                FamilyDef {
                    name: "columns".to_string(),
                    description: "Per-participant wall time across all trials".to_string(),
                    pattern: participant_pattern,
                    key_columns: vec!["participant".to_string()],
                    filter: None,
                    reduction: Reduction::Columns { with_std: true },
                },
                FamilyDef {
                    name: "phase_total".to_string(),
                    description: "Sum of transaction phase times per trial".to_string(),
                    pattern: format!(r"^{}_([A-Za-z]+)_wall_{}$", TXN_PLACEHOLDER, STAT_PLACEHOLDER),
                    key_columns: Vec::new(),
                    filter: None,
                    reduction: Reduction::Sum {
                        key_fields: vec!["input_num".to_string(), "block_num".to_string()],
                        exclude: vec!["getstate".to_string()],
                        value_column: TOTAL_COLUMN.to_string(),
                    },
                },
            ],
        }
    }
}

impl Default for FamilyTable {
    fn default() -> Self {
        Self::builtin()
    }
}
