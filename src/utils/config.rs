//! Configuration and constants for the library and CLI.

use std::time::Duration;

/// Action code of the synthetic root node of every call tree
pub const ROOT_ACTION_CODE: i32 = -1;

/// Action code that never names a registered action
pub const NO_ACTION: i32 = -1;

/// Name prefix used when exporting a code the actions set does not know
pub const UNKNOWN_ACTION_PREFIX: &str = "unknown_action_";

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Defaults for the `simulate` command
pub const DEFAULT_SIMULATION_THREADS: usize = 4;
pub const DEFAULT_SIMULATION_ITERATIONS: usize = 1_000;
pub const DEFAULT_BATCH_SIZE: usize = 16;

/// Default pause between two reporter snapshots while producers are running
pub const DEFAULT_REPORT_INTERVAL_MS: u64 = 50;
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_millis(DEFAULT_REPORT_INTERVAL_MS);
