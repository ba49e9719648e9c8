use crate::output::read_report;
use crate::output::schema::AggregatedActionDocument;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Validate a report JSON file and print its summary
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)
        .with_context(|| format!("Failed to read report {}", file_path.display()))?;

    let nodes: usize = report
        .total_call_tree
        .actions
        .iter()
        .map(AggregatedActionDocument::subtree_size)
        .sum();

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Generated: {}", report.generated_at);
    println!("  Traces: {}", report.traces_count);
    println!("  Top-level actions: {}", report.total_call_tree.actions.len());
    println!("  Aggregated nodes: {}", nodes);
    println!(
        "  Last trace: {}",
        if report.last_call_tree.is_some() { "present" } else { "absent" }
    );

    Ok(())
}

/// Print an aggregated action subtree, one line per node
pub fn print_action_tree(actions: &[AggregatedActionDocument], depth: usize) {
    for action in actions {
        println!(
            "{}{:<32} calls: {:>8}  time: {:>12}",
            "  ".repeat(depth),
            action.name,
            action.calls,
            action.time
        );
        print_action_tree(&action.actions, depth + 1);
    }
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("React Trace Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string            - Schema version (e.g., '1.0.0')");
        println!("  generated_at: string       - RFC 3339 timestamp");
        println!("  traces_count: number       - Traces folded into the total");
        println!("  total_call_tree: object    - Cumulative statistics");
        println!("    actions: array?          - Top-level actions (omitted when empty)");
        println!("      name: string           - Action name");
        println!("      time: number           - Total time consumed");
        println!("      calls: number          - Number of calls");
        println!("      actions: array?        - Nested actions");
        println!("  last_call_tree: object?    - Most recent trace");
        println!("    actions: array?          - Top-level actions in call order");
        println!("      name: string           - Action name");
        println!("      start_time: number     - Start timestamp");
        println!("      stop_time: number      - Stop timestamp");
        println!("      actions: array?        - Nested actions in call order");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("React Trace v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("In-process call-tree engine for lightweight action tracing.");
}
