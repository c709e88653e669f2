//! CLI command implementations.
//!
//! Commands orchestrate the library components to perform user tasks.

pub mod aggregate;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use aggregate::{batch_output_path, execute_aggregate, validate_args};
pub use models::AggregateArgs;
pub use utils::{display_families, display_version, inspect_input, load_table};
