//! Bench Aggregator CLI
//!
//! Post-processes benchmark result CSV files into summary CSV files.

use anyhow::Result;
use bench_aggregator::aggregator::TemplateVars;
use bench_aggregator::commands::{
    display_families, display_version, execute_aggregate, inspect_input, validate_args,
    AggregateArgs,
};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

/// Bench Aggregator - summarise wide benchmark CSV files
#[derive(Parser, Debug)]
#[command(name = "bench-agg")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one or more families over one or more wide CSV files
    Aggregate {
        /// Wide CSV input files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Family to run (repeatable)
        #[arg(short, long = "family", required = true)]
        families: Vec<String>,

        /// Transaction name for {txn} in patterns
        #[arg(long, env = "BENCH_AGG_TXN")]
        txn: Option<String>,

        /// Statistic suffix for {stat} in patterns (default: avg)
        #[arg(long)]
        stat: Option<String>,

        /// Use the local variant of each family when one exists
        #[arg(short, long)]
        local: bool,

        /// JSON family table replacing the built-in families
        #[arg(short, long, env = "BENCH_AGG_CONFIG")]
        config: Option<PathBuf>,

        /// Output CSV path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for batch outputs, named <input>_<family>.csv
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Output path for a JSON report
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Show how many columns each family matches in a file
    Inspect {
        /// Wide CSV input file
        input: PathBuf,

        /// Transaction name for {txn} in patterns
        #[arg(long, env = "BENCH_AGG_TXN")]
        txn: Option<String>,

        /// Statistic suffix for {stat} in patterns
        #[arg(long)]
        stat: Option<String>,

        /// JSON family table replacing the built-in families
        #[arg(short, long, env = "BENCH_AGG_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Display the family table
    Families {
        /// Show patterns and filters
        #[arg(long)]
        show: bool,

        /// JSON family table replacing the built-in families
        #[arg(short, long, env = "BENCH_AGG_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Aggregate {
            inputs,
            families,
            txn,
            stat,
            local,
            config,
            output,
            out_dir,
            report,
            summary,
        } => {
            let args = AggregateArgs {
                inputs,
                families,
                txn,
                stat,
                local,
                config,
                output,
                out_dir,
                report,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_aggregate(args)?;
        }

        Commands::Inspect {
            input,
            txn,
            stat,
            config,
        } => {
            inspect_input(&input, config.as_deref(), &TemplateVars::new(txn, stat))?;
        }

        Commands::Families { show, config } => {
            display_families(show, config.as_deref())?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
