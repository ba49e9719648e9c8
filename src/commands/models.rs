use crate::utils::config::{
    DEFAULT_BATCH_SIZE, DEFAULT_REPORT_INTERVAL, DEFAULT_SIMULATION_ITERATIONS,
    DEFAULT_SIMULATION_THREADS,
};
use std::path::PathBuf;
use std::time::Duration;

/// Arguments for the simulate command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct SimulateArgs {
    /// Number of producer threads
    pub threads: usize,

    /// Traced requests per producer thread
    pub iterations: usize,

    /// Traces folded locally before merging into the shared tree
    pub batch_size: usize,

    /// Pause between two reporter snapshots
    pub report_interval: Duration,

    /// Output path for the JSON report
    pub output_json: PathBuf,

    /// Print the total call tree to stdout
    pub print_summary: bool,
}

impl Default for SimulateArgs {
    fn default() -> Self {
        Self {
            threads: DEFAULT_SIMULATION_THREADS,
            iterations: DEFAULT_SIMULATION_ITERATIONS,
            batch_size: DEFAULT_BATCH_SIZE,
            report_interval: DEFAULT_REPORT_INTERVAL,
            output_json: PathBuf::from("stats.json"),
            print_summary: false,
        }
    }
}
