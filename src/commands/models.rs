use std::path::PathBuf;

use crate::aggregator::family::TemplateVars;

/// Arguments for the aggregate command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AggregateArgs {
    /// Wide CSV files to summarise
    pub inputs: Vec<PathBuf>,

    /// Families to run on every input
    pub families: Vec<String>,

    /// Transaction name substituted into `{txn}`
    pub txn: Option<String>,

    /// Statistic suffix substituted into `{stat}`
    pub stat: Option<String>,

    /// Prefer `<family>_local` variants
    pub local: bool,

    /// JSON family table replacing the built-in one
    pub config: Option<PathBuf>,

    /// Output CSV path (single input and family only)
    pub output: Option<PathBuf>,

    /// Directory for `<input_stem>_<family>.csv` outputs
    pub out_dir: Option<PathBuf>,

    /// Output path for the JSON report (single input and family only)
    pub report: Option<PathBuf>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl AggregateArgs {
    pub fn template_vars(&self) -> TemplateVars {
        TemplateVars::new(self.txn.clone(), self.stat.clone())
    }

    /// More than one CSV will be produced
    pub fn is_batch(&self) -> bool {
        self.inputs.len() * self.families.len() > 1
    }
}

impl Default for AggregateArgs {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            families: Vec::new(),
            txn: None,
            stat: None,
            local: false,
            config: None,
            output: None,
            out_dir: None,
            report: None,
            print_summary: false,
        }
    }
}
