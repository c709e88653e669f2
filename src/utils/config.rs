//! Configuration and constants for the CLI.

/// Current JSON report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Decimal places used for every floating point value in summary output
pub const VALUE_PRECISION: usize = 6;

/// Suffix appended to a family name to select its local variant
pub const LOCAL_SUFFIX: &str = "_local";

// Placeholders that may appear in family patterns
pub const TXN_PLACEHOLDER: &str = "{txn}";
pub const STAT_PLACEHOLDER: &str = "{stat}";
pub const INDEX_PLACEHOLDER: &str = "{index}";

/// Statistic suffix used when none is given on the command line
pub const DEFAULT_STAT: &str = "avg";

// Output column names shared by the built-in families
pub const PARTICIPANT_COUNT_COLUMN: &str = "num_participants";
pub const TOTAL_COLUMN: &str = "total";
pub const STATS_COLUMNS: &[&str] = &["avg", "min", "max"];
pub const STD_COLUMN: &str = "std";
pub const COUNT_COLUMN: &str = "count";
