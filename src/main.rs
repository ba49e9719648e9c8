//! React Trace CLI
//!
//! Drives the call tree engine with a synthetic multi-threaded workload and
//! inspects the statistics reports it produces.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;
use std::time::Duration;

use react_trace::commands::{
    display_schema, display_version, execute_simulate, validate_args, validate_report_file,
    SimulateArgs,
};
use react_trace::utils::config::{
    DEFAULT_BATCH_SIZE, DEFAULT_REPORT_INTERVAL_MS, DEFAULT_SIMULATION_ITERATIONS,
    DEFAULT_SIMULATION_THREADS,
};

/// React Trace - call tree statistics for traced actions
#[derive(Parser, Debug)]
#[command(name = "react-trace")]
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
    /// Trace a synthetic workload from several threads and write a report
    Simulate {
        /// Number of producer threads
        #[arg(short, long, default_value_t = DEFAULT_SIMULATION_THREADS, env = "REACT_TRACE_THREADS")]
        threads: usize,

        /// Traced requests per thread
        #[arg(short, long, default_value_t = DEFAULT_SIMULATION_ITERATIONS)]
        iterations: usize,

        /// Traces aggregated per thread before merging into the shared tree
        #[arg(short, long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// Milliseconds between two reporter snapshots
        #[arg(long = "report-every", value_name = "MS", default_value_t = DEFAULT_REPORT_INTERVAL_MS)]
        report_every: u64,

        /// Output path for the JSON report
        #[arg(short, long, default_value = "stats.json")]
        output: PathBuf,

        /// Print the total call tree to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Simulate {
            threads,
            iterations,
            batch_size,
            report_every,
            output,
            summary,
        } => {
            let args = SimulateArgs {
                threads,
                iterations,
                batch_size,
                report_interval: Duration::from_millis(report_every),
                output_json: output,
                print_summary: summary,
            };

            validate_args(&args)?;
            execute_simulate(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
